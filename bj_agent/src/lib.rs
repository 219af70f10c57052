pub mod game;
pub mod registry;
pub mod stats;
pub mod write;

pub use game::prelude::*;
use serde::{Deserialize, Serialize};
use game::table::MIN_RESHUFFLE_POINT;
use stats::StatsSnapshot;

pub mod prelude {
    pub use super::{
        game::prelude::*, registry::SessionRegistry, stats::StatsSnapshot, Session,
        SessionConfig, SessionConfigBuilder,
    };
}

/// Parameters of one counting session. Deserializes from camelCase JSON where every field is optional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    #[serde(alias = "bankroll")]
    pub starting_bankroll: f64,
    pub base_bet: f64,
    pub num_decks: usize,
    /// Fraction of the shoe dealt before reshuffling, strictly between 0 and 1.
    pub penetration: f64,
    #[serde(alias = "useCardCounting")]
    pub counting_enabled: bool,
    #[serde(alias = "useWonging")]
    pub wonging_enabled: bool,
    /// The player sits out while the true count is strictly below this.
    pub wonging_threshold: f64,
    pub max_bet_multiplier: f64,
}

impl SessionConfig {
    /// Associated method for returning a new `SessionConfigBuilder`. Any field left unset takes the standard
    /// value: a 1000 bankroll, a 10 base bet, six decks dealt to 75%, counting and wonging on, sitting out below
    /// a true count of -1 and spreading bets up to 10 units.
    pub fn new() -> SessionConfigBuilder {
        SessionConfigBuilder {
            starting_bankroll: None,
            base_bet: None,
            num_decks: None,
            penetration: None,
            counting_enabled: None,
            wonging_enabled: None,
            wonging_threshold: None,
            max_bet_multiplier: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.penetration.is_finite() && self.penetration > 0.0 && self.penetration < 1.0) {
            return Err(ConfigError::Penetration(self.penetration));
        }
        Shoe::check_decks(self.num_decks)?;
        let reshuffle_point = self.reshuffle_point();
        if reshuffle_point < MIN_RESHUFFLE_POINT {
            return Err(ConfigError::ReshufflePoint {
                got: reshuffle_point,
                min: MIN_RESHUFFLE_POINT,
            });
        }
        for (field, value) in [
            ("startingBankroll", self.starting_bankroll),
            ("baseBet", self.base_bet),
            ("maxBetMultiplier", self.max_bet_multiplier),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        Ok(())
    }

    /// Number of remaining cards below which the shoe is reshuffled before the next round.
    pub fn reshuffle_point(&self) -> usize {
        let total = (self.num_decks * bj_core::CARDS_PER_DECK) as f64;
        (total * (1.0 - self.penetration)).floor() as usize
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig::new().build()
    }
}

/// Struct to implement builder pattern for `SessionConfig`
#[derive(Clone, Copy)]
pub struct SessionConfigBuilder {
    starting_bankroll: Option<f64>,
    base_bet: Option<f64>,
    num_decks: Option<usize>,
    penetration: Option<f64>,
    counting_enabled: Option<bool>,
    wonging_enabled: Option<bool>,
    wonging_threshold: Option<f64>,
    max_bet_multiplier: Option<f64>,
}

impl SessionConfigBuilder {
    pub fn starting_bankroll(&mut self, bankroll: f64) -> &mut Self {
        self.starting_bankroll = Some(bankroll);
        self
    }

    /// The minimum bet, also the unit the bet ramp multiplies.
    pub fn base_bet(&mut self, bet: f64) -> &mut Self {
        self.base_bet = Some(bet);
        self
    }

    pub fn num_decks(&mut self, decks: usize) -> &mut Self {
        self.num_decks = Some(decks);
        self
    }

    pub fn penetration(&mut self, penetration: f64) -> &mut Self {
        self.penetration = Some(penetration);
        self
    }

    /// When off the player flat bets the base bet whatever the count.
    pub fn counting_enabled(&mut self, enabled: bool) -> &mut Self {
        self.counting_enabled = Some(enabled);
        self
    }

    pub fn wonging_enabled(&mut self, enabled: bool) -> &mut Self {
        self.wonging_enabled = Some(enabled);
        self
    }

    pub fn wonging_threshold(&mut self, threshold: f64) -> &mut Self {
        self.wonging_threshold = Some(threshold);
        self
    }

    pub fn max_bet_multiplier(&mut self, multiplier: f64) -> &mut Self {
        self.max_bet_multiplier = Some(multiplier);
        self
    }

    /// Method for building a `SessionConfig` from the builder. The result is not validated, the engine does that.
    pub fn build(&mut self) -> SessionConfig {
        SessionConfig {
            starting_bankroll: self.starting_bankroll.unwrap_or(1000.0),
            base_bet: self.base_bet.unwrap_or(10.0),
            num_decks: self.num_decks.unwrap_or(6),
            penetration: self.penetration.unwrap_or(0.75),
            counting_enabled: self.counting_enabled.unwrap_or(true),
            wonging_enabled: self.wonging_enabled.unwrap_or(true),
            wonging_threshold: self.wonging_threshold.unwrap_or(-1.0),
            max_bet_multiplier: self.max_bet_multiplier.unwrap_or(10.0),
        }
    }
}

/// A counting game together with the record of every round it dealt.
pub struct Session {
    engine: CountingGame,
    history: Vec<HandOutcome>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Session, ConfigError> {
        Ok(Session::from_engine(CountingGame::new(config)?))
    }

    pub fn from_engine(engine: CountingGame) -> Session {
        Session {
            engine,
            history: vec![],
        }
    }

    /// Plays one round and appends it to the history. Refused rounds leave the history untouched.
    pub fn play_one_hand(&mut self) -> Result<HandOutcome, BlackjackGameError> {
        let outcome = self.engine.play_one_hand()?;
        self.history.push(outcome.clone());
        Ok(outcome)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.engine.stats()
    }

    pub fn history(&self) -> &[HandOutcome] {
        &self.history
    }
}
