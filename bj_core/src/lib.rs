//! Card model shared by the blackjack agent: cards, hands, the multi deck shoe and the error types.

pub mod action;
pub mod card;
pub mod error;
pub mod hand;
pub mod shoe;

pub use action::Action;
pub use card::{Card, Rank, Suit, STANDARD_DECK};
pub use error::{BlackjackGameError, ConfigError};
pub use hand::Hand;
pub use shoe::{Shoe, CARDS_PER_DECK, MAX_DECKS};
