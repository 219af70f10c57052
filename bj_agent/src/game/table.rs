use crate::game::strategy::CountingStrategy;
use bj_core::{BlackjackGameError, Card, Hand, Shoe};
use tracing::debug;

/// The dealer draws below this total and stands on every 17, soft ones included.
pub const DEALER_STANDS_ON: u8 = 17;

/// Fewest cards the shoe may be reshuffled at. One round without splits draws well under this.
pub const MIN_RESHUFFLE_POINT: usize = 21;

/// The shoe together with the count of every card that has left it.
/// Cards only leave through this struct so the count always matches the shoe's composition.
pub struct BlackjackTable<C: CountingStrategy> {
    shoe: Shoe,
    counter: C,
    reshuffle_point: usize,
}

impl<C: CountingStrategy> BlackjackTable<C> {
    /// Associated function to seat a fresh counter at `shoe`. The shoe is reshuffled once fewer than
    /// `reshuffle_point` cards remain.
    pub fn new(shoe: Shoe, mut counter: C, reshuffle_point: usize) -> BlackjackTable<C> {
        counter.reset();
        BlackjackTable {
            shoe,
            counter,
            reshuffle_point,
        }
    }

    pub fn needs_reshuffle(&self) -> bool {
        self.shoe.needs_reshuffle(self.reshuffle_point)
    }

    /// Rebuilds the shoe and resets the count in the same step.
    pub fn reshuffle(&mut self) {
        debug!(
            remaining = self.shoe.remaining(),
            running_count = self.counter.running_count(),
            "reshuffling shoe, count reset"
        );
        self.shoe.rebuild();
        self.counter.reset();
    }

    /// Draws the top card and counts it.
    pub fn deal(&mut self) -> Result<Card, BlackjackGameError> {
        let card = self.shoe.draw()?;
        self.counter.count_card(&card);
        Ok(card)
    }

    pub fn deal_to(&mut self, hand: &mut Hand) -> Result<Card, BlackjackGameError> {
        let card = self.deal()?;
        hand.add_card(card);
        Ok(card)
    }

    /// Deals up to `n` cards face up into the discard, stopping early only if the shoe runs dry.
    pub fn burn(&mut self, n: usize) -> Vec<Card> {
        let mut burned = Vec::with_capacity(n);
        while burned.len() < n {
            match self.deal() {
                Ok(card) => burned.push(card),
                Err(_) => break,
            }
        }
        burned
    }

    /// Draws to the dealer's hand until it reaches `DEALER_STANDS_ON`.
    pub fn play_dealer(&mut self, dealer: &mut Hand) -> Result<(), BlackjackGameError> {
        while dealer.value() < DEALER_STANDS_ON {
            self.deal_to(dealer)?;
        }
        Ok(())
    }

    /// Moves `top` to the top of the shoe, see `Shoe::stack`.
    pub fn stack(&mut self, top: &[Card]) -> Result<(), BlackjackGameError> {
        self.shoe.stack(top)
    }

    pub fn running_count(&self) -> i32 {
        self.counter.running_count()
    }

    pub fn true_count(&self) -> f64 {
        self.counter.true_count(self.shoe.decks_remaining())
    }

    pub fn decks_remaining(&self) -> f64 {
        self.shoe.decks_remaining()
    }

    pub fn remaining(&self) -> usize {
        self.shoe.remaining()
    }

    pub fn cards_seen(&self) -> u32 {
        self.counter.cards_seen()
    }

    /// Running count, true count and decks remaining as the next round will see them.
    /// A pending reshuffle means a full shoe and a zero count.
    pub fn upcoming_counts(&self) -> (i32, f64, f64) {
        if self.needs_reshuffle() {
            (0, 0.0, self.shoe.num_decks() as f64)
        } else {
            (self.running_count(), self.true_count(), self.decks_remaining())
        }
    }
}
