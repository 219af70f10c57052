use crate::card::{Card, STANDARD_DECK};
use crate::error::{BlackjackGameError, ConfigError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Number of cards in a single deck.
pub const CARDS_PER_DECK: usize = 52;

/// Largest shoe dealt.
pub const MAX_DECKS: usize = 8;

/// A multi deck shoe. The top of the shoe is the end of `cards`, so drawing is a pop.
/// The shoe owns its random source and uses it only for shuffling.
#[derive(Debug)]
pub struct Shoe {
    cards: Vec<Card>,
    num_decks: usize,
    rng: StdRng,
}

impl Shoe {
    /// Associated function to build a freshly shuffled shoe of `num_decks` decks seeded from entropy.
    pub fn new(num_decks: usize) -> Result<Shoe, ConfigError> {
        Shoe::with_rng(num_decks, StdRng::from_entropy())
    }

    /// Builds a shoe whose every shuffle is reproducible from `seed`.
    pub fn seeded(num_decks: usize, seed: u64) -> Result<Shoe, ConfigError> {
        Shoe::with_rng(num_decks, StdRng::seed_from_u64(seed))
    }

    /// Fails unless `num_decks` is between 1 and `MAX_DECKS`.
    pub fn with_rng(num_decks: usize, rng: StdRng) -> Result<Shoe, ConfigError> {
        Shoe::check_decks(num_decks)?;
        let mut shoe = Shoe {
            cards: Vec::with_capacity(num_decks * CARDS_PER_DECK),
            num_decks,
            rng,
        };
        shoe.rebuild();
        Ok(shoe)
    }

    pub fn check_decks(num_decks: usize) -> Result<(), ConfigError> {
        match num_decks {
            0 => Err(ConfigError::NoDecks),
            n if n > MAX_DECKS => Err(ConfigError::TooManyDecks {
                got: n,
                max: MAX_DECKS,
            }),
            _ => Ok(()),
        }
    }

    /// Throws away whatever is left and builds a complete, uniformly shuffled shoe.
    pub fn rebuild(&mut self) {
        self.cards.clear();
        for _ in 0..self.num_decks {
            self.cards.extend(STANDARD_DECK.iter().copied());
        }
        self.cards.shuffle(&mut self.rng);
    }

    /// Removes and returns the top card.
    pub fn draw(&mut self) -> Result<Card, BlackjackGameError> {
        self.cards.pop().ok_or(BlackjackGameError::ShoeExhausted)
    }

    /// Moves `top` to the top of the shoe so that `top[0]` is the next card drawn.
    /// Every card must still be in the shoe, composition is left unchanged. On error the shoe is untouched.
    pub fn stack(&mut self, top: &[Card]) -> Result<(), BlackjackGameError> {
        let mut rest = self.cards.clone();
        for card in top {
            match rest.iter().position(|c| c == card) {
                Some(idx) => {
                    rest.remove(idx);
                }
                None => return Err(BlackjackGameError::CardNotInShoe(*card)),
            }
        }
        rest.extend(top.iter().rev().copied());
        self.cards = rest;
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn decks_remaining(&self) -> f64 {
        self.cards.len() as f64 / CARDS_PER_DECK as f64
    }

    pub fn num_decks(&self) -> usize {
        self.num_decks
    }

    /// True when fewer than `threshold` cards are left. Pure, the caller decides when to rebuild.
    pub fn needs_reshuffle(&self, threshold: usize) -> bool {
        self.cards.len() < threshold
    }
}
