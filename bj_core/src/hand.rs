use crate::card::Card;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A hand held by the player or the dealer for a single round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
    wager: f64,
    doubled: bool,
}

impl Hand {
    pub fn new() -> Hand {
        Hand::default()
    }

    /// Associated function to create an empty hand that carries `wager`.
    pub fn with_wager(wager: f64) -> Hand {
        Hand {
            cards: Vec::new(),
            wager,
            doubled: false,
        }
    }

    /// Builds a hand from the given cards, intended for replaying known situations.
    pub fn from_cards<I: IntoIterator<Item = Card>>(cards: I) -> Hand {
        Hand {
            cards: cards.into_iter().collect(),
            wager: 0.0,
            doubled: false,
        }
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn wager(&self) -> f64 {
        self.wager
    }

    pub fn is_doubled(&self) -> bool {
        self.doubled
    }

    /// Doubles the wager on the hand. The caller is responsible for dealing exactly one more card.
    pub fn double_down(&mut self) {
        self.wager *= 2.0;
        self.doubled = true;
    }

    /// Sum of the card values with every ace counted as 11.
    pub fn raw_total(&self) -> u32 {
        self.cards.iter().map(|c| c.value() as u32).sum()
    }

    /// Returns the reduced total and the number of aces still counted as 11.
    fn reduced(&self) -> (u32, usize) {
        let mut total = self.raw_total();
        let mut soft_aces = self.cards.iter().filter(|c| c.is_ace()).count();
        while total > 21 && soft_aces > 0 {
            total -= 10;
            soft_aces -= 1;
        }
        (total, soft_aces)
    }

    /// Value of the hand, aces are reduced from 11 to 1 one at a time while the hand would otherwise bust.
    pub fn value(&self) -> u8 {
        u8::try_from(self.reduced().0).unwrap_or(u8::MAX)
    }

    /// A soft hand still counts at least one ace as 11.
    pub fn is_soft(&self) -> bool {
        let (total, soft_aces) = self.reduced();
        soft_aces > 0 && total <= 21
    }

    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.value() == 21
    }

    pub fn is_busted(&self) -> bool {
        self.reduced().0 > 21
    }

    /// Two cards of equal value, so a ten and a king form a splittable pair.
    pub fn is_splittable(&self) -> bool {
        self.cards.len() == 2 && self.cards[0].value() == self.cards[1].value()
    }
}

impl Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cards = self
            .cards
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "{} (Value: {})", cards, self.value())
    }
}
