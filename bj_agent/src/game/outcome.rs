use bj_core::{Action, Card};
use serde::{Deserialize, Serialize};

/// How a played hand ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HandResult {
    Push,
    PlayerBlackjack,
    DealerBlackjack,
    PlayerBust,
    PlayerWin,
    DealerWin,
}

/// Payout of a natural.
pub const BLACKJACK_PAYOUT: f64 = 1.5;

impl HandResult {
    /// Signed change to the bankroll for a hand that ended this way with `wager` on it.
    pub fn profit(&self, wager: f64) -> f64 {
        match self {
            HandResult::PlayerBlackjack => wager * BLACKJACK_PAYOUT,
            HandResult::PlayerWin => wager,
            HandResult::Push => 0.0,
            HandResult::DealerBlackjack | HandResult::PlayerBust | HandResult::DealerWin => -wager,
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self, HandResult::PlayerBlackjack | HandResult::PlayerWin)
    }

    pub fn is_loss(&self) -> bool {
        matches!(
            self,
            HandResult::DealerBlackjack | HandResult::PlayerBust | HandResult::DealerWin
        )
    }
}

/// Everything that happened during one round, including rounds the player sat out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandOutcome {
    pub hand_number: u32,
    pub bankroll_before: f64,
    pub bankroll_after: f64,
    pub running_count: i32,
    pub true_count: f64,
    pub decks_remaining: f64,
    pub reshuffle: bool,
    pub sat_out: bool,
    pub burned_cards: Vec<Card>,
    pub bet: f64,
    pub bet_multiplier: f64,
    pub player_hand: Vec<Card>,
    pub dealer_hand: Vec<Card>,
    pub player_value: Option<u8>,
    pub dealer_value: Option<u8>,
    pub actions: Vec<Action>,
    pub result: Option<HandResult>,
    pub profit: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profit() {
        assert_eq!(HandResult::PlayerBlackjack.profit(10.0), 15.0);
        assert_eq!(HandResult::PlayerWin.profit(10.0), 10.0);
        assert_eq!(HandResult::Push.profit(10.0), 0.0);
        assert_eq!(HandResult::DealerBlackjack.profit(10.0), -10.0);
        assert_eq!(HandResult::PlayerBust.profit(20.0), -20.0);
        assert_eq!(HandResult::DealerWin.profit(10.0), -10.0);
    }

    #[test]
    fn test_result_names() {
        let json = serde_json::to_string(&HandResult::PlayerBlackjack).unwrap();
        assert_eq!(json, r#""playerBlackjack""#);
        let json = serde_json::to_string(&HandResult::Push).unwrap();
        assert_eq!(json, r#""push""#);
    }
}
