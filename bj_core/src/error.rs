use crate::action::Action;
use crate::card::Card;
use thiserror::Error;

/// Rejected session settings. Nothing is built when one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("penetration must be within (0, 1) (got {0})")]
    Penetration(f64),
    #[error("{field} must be > 0 (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("a shoe needs at least one deck")]
    NoDecks,
    #[error("a shoe holds at most {max} decks (got {got})")]
    TooManyDecks { got: usize, max: usize },
    /// The shoe would be reshuffled too late to finish a round without running dry.
    #[error("reshuffle point of {got} cards is below the minimum of {min}")]
    ReshufflePoint { got: usize, min: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlackjackGameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The bankroll cannot cover the bet for the next round. Nothing was mutated.
    #[error("insufficient funds: bankroll {bankroll:.2} cannot cover a bet of {bet:.2}")]
    InsufficientFunds { bankroll: f64, bet: f64 },
    /// A card was requested from an empty shoe. The reshuffle policy should make this impossible,
    /// a session that returns it is in an inconsistent state and must be discarded.
    #[error("attempted to draw from an empty shoe")]
    ShoeExhausted,
    #[error("{0} cannot be played at this table")]
    IllegalAction(Action),
    #[error("{0} is not left in the shoe")]
    CardNotInShoe(Card),
}

impl BlackjackGameError {
    pub fn is_out_of_funds(&self) -> bool {
        matches!(self, BlackjackGameError::InsufficientFunds { .. })
    }

    /// Errors after which the session state can no longer be trusted.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BlackjackGameError::ShoeExhausted | BlackjackGameError::IllegalAction(_)
        )
    }
}
