use bj_core::{Action, Card, Hand, Rank};
use std::fmt::Display;

pub mod prelude {
    pub use super::{
        BasicStrategy, BettingStrategy, CountingStrategy, DecisionStrategy, HiLo,
        RampBettingStrategy,
    };
}

/// Trait for a specific counting strategy. The running count must return to zero on `reset`,
/// the table resets it together with every rebuild of the shoe.
pub trait CountingStrategy {
    /// Counts `card` and returns the tag that was added to the running count.
    fn count_card(&mut self, card: &Card) -> i32;
    fn running_count(&self) -> i32;
    fn cards_seen(&self) -> u32;
    fn reset(&mut self);

    /// Running count normalized by the decks left in the shoe, zero when no decks remain.
    fn true_count(&self, decks_remaining: f64) -> f64 {
        if decks_remaining <= 0.0 {
            return 0.0;
        }
        self.running_count() as f64 / decks_remaining
    }
}

/// The Hi-Lo balanced count. Low cards leaving the shoe raise the count, tens and aces lower it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HiLo {
    running_count: i32,
    cards_seen: u32,
}

impl HiLo {
    pub fn new() -> HiLo {
        HiLo::default()
    }

    /// Hi-Lo tag for a rank.
    pub fn tag(rank: Rank) -> i32 {
        match rank {
            Rank::Two | Rank::Three | Rank::Four | Rank::Five | Rank::Six => 1,
            Rank::Seven | Rank::Eight | Rank::Nine => 0,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King | Rank::Ace => -1,
        }
    }
}

impl CountingStrategy for HiLo {
    fn count_card(&mut self, card: &Card) -> i32 {
        let tag = HiLo::tag(card.rank);
        self.running_count += tag;
        self.cards_seen += 1;
        tag
    }

    fn running_count(&self) -> i32 {
        self.running_count
    }

    fn cards_seen(&self) -> u32 {
        self.cards_seen
    }

    fn reset(&mut self) {
        self.running_count = 0;
        self.cards_seen = 0;
    }
}

impl Display for HiLo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = "total cards counted:".len() + 2;
        write!(
            f,
            "{:<width$}{:>+}\n{:<width$}{}",
            "running count:", self.running_count, "total cards counted:", self.cards_seen,
        )
    }
}

/// Trait for a generic betting strategy.
pub trait BettingStrategy {
    /// Wager for the next round given the current true count and bankroll.
    fn bet(&self, true_count: f64, bankroll: f64) -> f64;
    /// The table minimum the strategy never bets below.
    fn base_bet(&self) -> f64;
}

/// Share of the bankroll a single bet may risk.
pub const MAX_BANKROLL_FRACTION: f64 = 0.05;

/// Bet ramp keyed on the true count: 1x below +1, then 2x, 4x, 6x and 8x from +4 upward,
/// capped by the configured multiplier and by the bankroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampBettingStrategy {
    base_bet: f64,
    max_multiplier: f64,
}

impl RampBettingStrategy {
    pub fn new(base_bet: f64, max_multiplier: f64) -> RampBettingStrategy {
        RampBettingStrategy {
            base_bet,
            max_multiplier,
        }
    }

    /// Step function from the true count to a bet multiplier.
    pub fn multiplier(true_count: f64) -> f64 {
        if true_count < 1.0 {
            1.0
        } else if true_count < 2.0 {
            2.0
        } else if true_count < 3.0 {
            4.0
        } else if true_count < 4.0 {
            6.0
        } else {
            8.0
        }
    }

    /// Sizes a bet. The multiplier is capped at `max_multiplier`, the bet at 5% of the bankroll and then at the
    /// bankroll itself, and the result is never below `base_bet`.
    pub fn bet_amount(true_count: f64, bankroll: f64, base_bet: f64, max_multiplier: f64) -> f64 {
        let multiplier = f64::min(RampBettingStrategy::multiplier(true_count), max_multiplier);
        let bet = (base_bet * multiplier)
            .min(bankroll * MAX_BANKROLL_FRACTION)
            .min(bankroll);
        f64::max(base_bet, bet)
    }
}

impl BettingStrategy for RampBettingStrategy {
    fn bet(&self, true_count: f64, bankroll: f64) -> f64 {
        RampBettingStrategy::bet_amount(true_count, bankroll, self.base_bet, self.max_multiplier)
    }

    fn base_bet(&self) -> f64 {
        self.base_bet
    }
}

/// Trait for a generic decision strategy. Takes the player's hand, the value of the dealer's face up card
/// (an ace is 11) and what the table currently allows, and returns the play.
pub trait DecisionStrategy {
    fn decide(&self, hand: &Hand, dealer_upcard: u8, can_double: bool, can_split: bool) -> Action;
}

/// A cell of the hard and soft charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Play {
    H,
    S,
    /// Double when allowed, hit otherwise.
    D,
}

use Play::{D, H, S};

const Y: bool = true;
const N: bool = false;

// Columns are the dealer up card: 2 3 4 5 6 7 8 9 10 A

/// Hard totals, rows 8 (and below) through 17 (and above).
const HARD_TOTALS: [[Play; 10]; 10] = [
    [H, H, H, H, H, H, H, H, H, H], // 8
    [H, D, D, D, D, H, H, H, H, H], // 9
    [D, D, D, D, D, D, D, D, H, H], // 10
    [D, D, D, D, D, D, D, D, D, D], // 11
    [H, H, S, S, S, H, H, H, H, H], // 12
    [S, S, S, S, S, H, H, H, H, H], // 13
    [S, S, S, S, S, H, H, H, H, H], // 14
    [S, S, S, S, S, H, H, H, H, H], // 15
    [S, S, S, S, S, H, H, H, H, H], // 16
    [S, S, S, S, S, S, S, S, S, S], // 17
];
const HARD_FIRST_ROW: u8 = 8;
const HARD_LAST_ROW: u8 = 17;

/// Two card soft totals, rows 12 (and below) through 19 (and above).
const SOFT_TOTALS: [[Play; 10]; 8] = [
    [H, H, H, H, H, H, H, H, H, H], // A,A
    [H, H, H, D, D, H, H, H, H, H], // A,2
    [H, H, H, D, D, H, H, H, H, H], // A,3
    [H, H, D, D, D, H, H, H, H, H], // A,4
    [H, H, D, D, D, H, H, H, H, H], // A,5
    [H, D, D, D, D, H, H, H, H, H], // A,6
    [S, D, D, D, D, S, S, H, H, H], // A,7
    [S, S, S, S, S, S, S, S, S, S], // A,8
];
const SOFT_FIRST_ROW: u8 = 12;
const SOFT_LAST_ROW: u8 = 19;

/// Whether to split a pair, rows are the value of the paired card from 2 through A.
const PAIR_SPLITS: [[bool; 10]; 10] = [
    [Y, Y, Y, Y, Y, Y, N, N, N, N], // 2,2
    [Y, Y, Y, Y, Y, Y, N, N, N, N], // 3,3
    [N, N, N, Y, Y, N, N, N, N, N], // 4,4
    [N, N, N, N, N, N, N, N, N, N], // 5,5
    [Y, Y, Y, Y, Y, N, N, N, N, N], // 6,6
    [Y, Y, Y, Y, Y, Y, N, N, N, N], // 7,7
    [Y, Y, Y, Y, Y, Y, Y, Y, Y, Y], // 8,8
    [Y, Y, Y, Y, Y, N, Y, Y, N, N], // 9,9
    [N, N, N, N, N, N, N, N, N, N], // 10,10
    [Y, Y, Y, Y, Y, Y, Y, Y, Y, Y], // A,A
];

/// Column of the charts for a dealer up card value.
fn upcard_column(dealer_upcard: u8) -> usize {
    (dealer_upcard.clamp(2, 11) - 2) as usize
}

fn resolve(play: Play, can_double: bool) -> Action {
    match play {
        H => Action::Hit,
        S => Action::Stand,
        D if can_double => Action::Double,
        D => Action::Hit,
    }
}

/// Count independent basic strategy read from the charts above.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicStrategy;

impl BasicStrategy {
    pub fn new() -> BasicStrategy {
        BasicStrategy
    }

    pub fn hard_decision(&self, total: u8, dealer_upcard: u8, can_double: bool) -> Action {
        let row = (total.clamp(HARD_FIRST_ROW, HARD_LAST_ROW) - HARD_FIRST_ROW) as usize;
        resolve(HARD_TOTALS[row][upcard_column(dealer_upcard)], can_double)
    }

    pub fn soft_decision(&self, total: u8, dealer_upcard: u8, can_double: bool) -> Action {
        let row = (total.clamp(SOFT_FIRST_ROW, SOFT_LAST_ROW) - SOFT_FIRST_ROW) as usize;
        resolve(SOFT_TOTALS[row][upcard_column(dealer_upcard)], can_double)
    }

    /// Whether a pair of cards worth `pair_value` each should be split against `dealer_upcard`.
    pub fn should_split(&self, pair_value: u8, dealer_upcard: u8) -> bool {
        let row = (pair_value.clamp(2, 11) - 2) as usize;
        PAIR_SPLITS[row][upcard_column(dealer_upcard)]
    }
}

impl DecisionStrategy for BasicStrategy {
    fn decide(&self, hand: &Hand, dealer_upcard: u8, can_double: bool, can_split: bool) -> Action {
        if can_split && hand.is_splittable() {
            if self.should_split(hand.cards()[0].value(), dealer_upcard) {
                return Action::Split;
            }
            // Unsplit pairs are played as the hard total of the pair
            return self.hard_decision(hand.value(), dealer_upcard, can_double);
        }

        if hand.len() == 2 && hand.is_soft() {
            return self.soft_decision(hand.value(), dealer_upcard, can_double);
        }

        self.hard_decision(hand.value(), dealer_upcard, can_double)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bj_core::{Suit, STANDARD_DECK};

    fn hand(ranks: &[Rank]) -> Hand {
        Hand::from_cards(ranks.iter().map(|&r| Card::new(r, Suit::Clubs)))
    }

    #[test]
    fn test_hilo_tags() {
        let mut counter = HiLo::new();
        let tags: Vec<i32> = Rank::ALL
            .iter()
            .map(|&r| counter.count_card(&Card::new(r, Suit::Hearts)))
            .collect();
        assert_eq!(tags, vec![1, 1, 1, 1, 1, 0, 0, 0, -1, -1, -1, -1, -1]);
        assert_eq!(counter.running_count(), 0);
        assert_eq!(counter.cards_seen(), 13);
    }

    #[test]
    fn test_full_deck_is_balanced() {
        let mut counter = HiLo::new();
        for card in STANDARD_DECK.iter() {
            counter.count_card(card);
        }
        assert_eq!(counter.running_count(), 0);
        assert_eq!(counter.cards_seen(), 52);
    }

    #[test]
    fn test_true_count() {
        let mut counter = HiLo::new();
        for _ in 0..6 {
            counter.count_card(&Card::new(Rank::Four, Suit::Spades));
        }
        assert_eq!(counter.true_count(3.0), 2.0);
        assert_eq!(counter.true_count(0.0), 0.0);
        assert_eq!(counter.true_count(-1.0), 0.0);

        counter.reset();
        assert_eq!(counter.running_count(), 0);
        assert_eq!(counter.cards_seen(), 0);
        assert_eq!(counter.true_count(6.0), 0.0);
    }

    #[test]
    fn test_bet_ramp() {
        let bet = |tc| RampBettingStrategy::bet_amount(tc, 10_000.0, 10.0, 10.0);
        assert_eq!(bet(-3.0), 10.0);
        assert_eq!(bet(0.99), 10.0);
        assert_eq!(bet(1.0), 20.0);
        assert_eq!(bet(2.5), 40.0);
        assert_eq!(bet(3.0), 60.0);
        assert_eq!(bet(4.0), 80.0);
        assert_eq!(bet(12.0), 80.0);
    }

    #[test]
    fn test_bankroll_cap_overrides_multiplier() {
        assert_eq!(RampBettingStrategy::bet_amount(3.5, 1000.0, 10.0, 10.0), 50.0);
    }

    #[test]
    fn test_max_multiplier_cap() {
        assert_eq!(RampBettingStrategy::bet_amount(5.0, 10_000.0, 10.0, 3.0), 30.0);
    }

    #[test]
    fn test_bet_floor() {
        // 5% of 100 is 5, below the base bet, so the base bet wins
        assert_eq!(RampBettingStrategy::bet_amount(4.0, 100.0, 10.0, 10.0), 10.0);
        assert_eq!(RampBettingStrategy::bet_amount(4.0, 5.0, 10.0, 10.0), 10.0);
    }

    #[test]
    fn test_bet_monotonic_and_bounded() {
        let strategy = RampBettingStrategy::new(10.0, 10.0);
        for &bankroll in &[50.0, 200.0, 500.0, 1000.0, 1234.5, 5000.0, 100_000.0] {
            let mut previous = 0.0;
            let upper = f64::min(f64::min(10.0 * 10.0, 0.05 * bankroll), bankroll);
            for step in -80..=80 {
                let tc = step as f64 / 10.0;
                let bet = strategy.bet(tc, bankroll);
                assert!(bet >= previous, "bet decreased at tc {tc} bankroll {bankroll}");
                assert!(bet >= 10.0);
                assert!(bet <= f64::max(upper, 10.0));
                previous = bet;
            }
        }
    }

    #[test]
    fn test_strategy_fixed_points() {
        let strategy = BasicStrategy::new();
        // hard 11 vs 6
        assert_eq!(
            strategy.decide(&hand(&[Rank::Six, Rank::Five]), 6, true, true),
            Action::Double
        );
        // aces always split
        for upcard in 2..=11 {
            assert_eq!(
                strategy.decide(&hand(&[Rank::Ace, Rank::Ace]), upcard, true, true),
                Action::Split
            );
        }
        // hard 17 always stands
        for upcard in 2..=11 {
            assert_eq!(
                strategy.decide(&hand(&[Rank::King, Rank::Seven]), upcard, true, true),
                Action::Stand
            );
            assert_eq!(
                strategy.decide(&hand(&[Rank::Four, Rank::Six, Rank::Seven]), upcard, false, false),
                Action::Stand
            );
        }
        // soft 18 vs 9
        assert_eq!(
            strategy.decide(&hand(&[Rank::Ace, Rank::Seven]), 9, true, true),
            Action::Hit
        );
        // fives are played as hard 10
        assert_eq!(
            strategy.decide(&hand(&[Rank::Five, Rank::Five]), 6, true, true),
            Action::Double
        );
    }

    #[test]
    fn test_double_falls_back_to_hit() {
        let strategy = BasicStrategy::new();
        assert_eq!(
            strategy.decide(&hand(&[Rank::Six, Rank::Five]), 6, false, false),
            Action::Hit
        );
        // soft 18 vs 4 doubles, and hits rather than stands when doubling is not allowed
        assert_eq!(
            strategy.decide(&hand(&[Rank::Ace, Rank::Seven]), 4, true, false),
            Action::Double
        );
        assert_eq!(
            strategy.decide(&hand(&[Rank::Ace, Rank::Seven]), 4, false, false),
            Action::Hit
        );
        assert_eq!(
            strategy.decide(&hand(&[Rank::Ace, Rank::Seven]), 7, false, false),
            Action::Stand
        );
    }

    #[test]
    fn test_pair_table() {
        let strategy = BasicStrategy::new();
        let splits = |rank: Rank, upcard: u8| {
            strategy.decide(&hand(&[rank, rank]), upcard, true, true) == Action::Split
        };
        for upcard in 2..=11 {
            assert!(splits(Rank::Eight, upcard));
            assert!(!splits(Rank::Five, upcard));
            assert!(!splits(Rank::King, upcard));
            assert_eq!(splits(Rank::Two, upcard), (2..=7).contains(&upcard));
            assert_eq!(splits(Rank::Three, upcard), (2..=7).contains(&upcard));
            assert_eq!(splits(Rank::Seven, upcard), (2..=7).contains(&upcard));
            assert_eq!(splits(Rank::Four, upcard), (5..=6).contains(&upcard));
            assert_eq!(splits(Rank::Six, upcard), (2..=6).contains(&upcard));
            assert_eq!(
                splits(Rank::Nine, upcard),
                (2..=6).contains(&upcard) || (8..=9).contains(&upcard)
            );
        }
        // a ten and a king are a pair by value
        assert_eq!(
            strategy.decide(&hand(&[Rank::Ten, Rank::King]), 6, true, true),
            Action::Stand
        );
        // nines against a seven fall through to hard 18
        assert_eq!(
            strategy.decide(&hand(&[Rank::Nine, Rank::Nine]), 7, true, true),
            Action::Stand
        );
        // without splitting allowed eights are a hard 16
        assert_eq!(
            strategy.decide(&hand(&[Rank::Eight, Rank::Eight]), 10, true, false),
            Action::Hit
        );
    }

    #[test]
    fn test_hard_table() {
        let strategy = BasicStrategy::new();
        for upcard in 2..=11u8 {
            assert_eq!(strategy.hard_decision(5, upcard, true), Action::Hit);
            assert_eq!(strategy.hard_decision(8, upcard, true), Action::Hit);
            assert_eq!(strategy.hard_decision(11, upcard, true), Action::Double);
            assert_eq!(strategy.hard_decision(11, upcard, false), Action::Hit);
            assert_eq!(strategy.hard_decision(20, upcard, true), Action::Stand);
            let expected_nine = if (3..=6).contains(&upcard) {
                Action::Double
            } else {
                Action::Hit
            };
            assert_eq!(strategy.hard_decision(9, upcard, true), expected_nine);
            let expected_ten = if upcard <= 9 {
                Action::Double
            } else {
                Action::Hit
            };
            assert_eq!(strategy.hard_decision(10, upcard, true), expected_ten);
            let expected_twelve = if (4..=6).contains(&upcard) {
                Action::Stand
            } else {
                Action::Hit
            };
            assert_eq!(strategy.hard_decision(12, upcard, true), expected_twelve);
            for total in 13..=16 {
                let expected = if upcard <= 6 {
                    Action::Stand
                } else {
                    Action::Hit
                };
                assert_eq!(strategy.hard_decision(total, upcard, true), expected);
            }
        }
    }

    #[test]
    fn test_soft_table() {
        let strategy = BasicStrategy::new();
        let in_set = |upcard: u8, set: &[u8]| set.contains(&upcard);
        for upcard in 2..=11u8 {
            assert_eq!(strategy.soft_decision(19, upcard, true), Action::Stand);
            assert_eq!(strategy.soft_decision(20, upcard, true), Action::Stand);
            assert_eq!(strategy.soft_decision(12, upcard, true), Action::Hit);
            let seventeen = if in_set(upcard, &[3, 4, 5, 6]) {
                Action::Double
            } else {
                Action::Hit
            };
            assert_eq!(strategy.soft_decision(17, upcard, true), seventeen);
            for total in [15, 16] {
                let expected = if in_set(upcard, &[4, 5, 6]) {
                    Action::Double
                } else {
                    Action::Hit
                };
                assert_eq!(strategy.soft_decision(total, upcard, true), expected);
            }
            for total in [13, 14] {
                let expected = if in_set(upcard, &[5, 6]) {
                    Action::Double
                } else {
                    Action::Hit
                };
                assert_eq!(strategy.soft_decision(total, upcard, true), expected);
            }
            let eighteen = if in_set(upcard, &[3, 4, 5, 6]) {
                Action::Double
            } else if in_set(upcard, &[2, 7, 8]) {
                Action::Stand
            } else {
                Action::Hit
            };
            assert_eq!(strategy.soft_decision(18, upcard, true), eighteen);
        }
    }

    #[test]
    fn test_soft_table_only_for_two_cards() {
        let strategy = BasicStrategy::new();
        // three card soft 17 uses the hard chart and stands
        let h = hand(&[Rank::Ace, Rank::Two, Rank::Four]);
        assert!(h.is_soft());
        assert_eq!(strategy.decide(&h, 5, false, false), Action::Stand);
    }
}
