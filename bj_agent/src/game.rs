//! Module that plays the agent's session one hand at a time. `GameEngine` owns the table, the bankroll and the
//! session tallies and runs every round through the same pipeline: reshuffle check, wonging check, bet sizing,
//! the deal, naturals, the player's turn, the dealer's turn and settlement.

pub mod outcome;
pub mod player;
pub mod strategy;
pub mod table;
pub mod prelude {
    pub use super::{CountingGame, GameEngine, RunSummary};
    pub use crate::game::outcome::{HandOutcome, HandResult};
    pub use crate::game::player::Player;
    pub use crate::game::strategy::prelude::*;
    pub use crate::game::table::BlackjackTable;
    pub use bj_core::{Action, BlackjackGameError, Card, ConfigError, Hand, Shoe};
}

pub use prelude::*;

use crate::stats::{roi, SessionStats, StatsSnapshot};
use crate::SessionConfig;
use tracing::{debug, warn};

/// Cards a sat out round burns, about what one hand uses.
pub const SIT_OUT_BURN: usize = 4;

/// The engine with the agent's Hi-Lo count, basic strategy and bet ramp.
pub type CountingGame = GameEngine<HiLo, BasicStrategy, RampBettingStrategy>;

/// Result of `GameEngine::run`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub attempts: u32,
    pub hands_played: u32,
    pub ended_early: bool,
}

/// Plays a session of blackjack for a counting player. Not internally synchronized: a host serving several
/// callers must hold one lock per engine.
pub struct GameEngine<C, D, B>
where
    C: CountingStrategy,
    D: DecisionStrategy,
    B: BettingStrategy,
{
    config: SessionConfig,
    table: BlackjackTable<C>,
    player: Player,
    decision_strategy: D,
    betting_strategy: B,
    stats: SessionStats,
}

impl CountingGame {
    /// Associated method for building a new session from `config` with an entropy seeded shoe.
    pub fn new(config: SessionConfig) -> Result<CountingGame, ConfigError> {
        config.validate()?;
        CountingGame::with_shoe(config, Shoe::new(config.num_decks)?)
    }

    /// Builds a session whose shuffles are reproducible from `seed`.
    pub fn seeded(config: SessionConfig, seed: u64) -> Result<CountingGame, ConfigError> {
        config.validate()?;
        CountingGame::with_shoe(config, Shoe::seeded(config.num_decks, seed)?)
    }

    /// Builds a session around an already built shoe of `config.num_decks` decks.
    pub fn with_shoe(config: SessionConfig, shoe: Shoe) -> Result<CountingGame, ConfigError> {
        GameEngine::from_parts(
            config,
            shoe,
            HiLo::new(),
            BasicStrategy::new(),
            RampBettingStrategy::new(config.base_bet, config.max_bet_multiplier),
        )
    }
}

impl<C, D, B> GameEngine<C, D, B>
where
    C: CountingStrategy,
    D: DecisionStrategy,
    B: BettingStrategy,
{
    pub fn from_parts(
        config: SessionConfig,
        shoe: Shoe,
        counter: C,
        decision_strategy: D,
        betting_strategy: B,
    ) -> Result<GameEngine<C, D, B>, ConfigError> {
        config.validate()?;
        let table = BlackjackTable::new(shoe, counter, config.reshuffle_point());
        Ok(GameEngine {
            config,
            table,
            player: Player::new(config.starting_bankroll),
            decision_strategy,
            betting_strategy,
            stats: SessionStats::default(),
        })
    }

    pub fn table(&self) -> &BlackjackTable<C> {
        &self.table
    }

    /// Mutable access to the table, used to stack the shoe for replaying a known deal.
    pub fn table_mut(&mut self) -> &mut BlackjackTable<C> {
        &mut self.table
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn bankroll(&self) -> f64 {
        self.player.bankroll()
    }

    /// Plays one round. Returns `InsufficientFunds` without touching any state when the bankroll cannot cover the
    /// bet. `ShoeExhausted` and `IllegalAction` are fatal for the session.
    pub fn play_one_hand(&mut self) -> Result<HandOutcome, BlackjackGameError> {
        let hand_number = self.stats.opportunities() + 1;
        let bankroll_before = self.player.bankroll();
        let reshuffle = self.table.needs_reshuffle();
        let (running_count, true_count, decks_remaining) = self.table.upcoming_counts();

        if self.config.wonging_enabled && true_count < self.config.wonging_threshold {
            if reshuffle {
                self.table.reshuffle();
            }
            let burned_cards = self.table.burn(SIT_OUT_BURN);
            self.stats.record_sat_out();
            debug!(
                hand_number,
                true_count,
                threshold = self.config.wonging_threshold,
                burned = burned_cards.len(),
                "count too negative, sitting out"
            );
            return Ok(HandOutcome {
                hand_number,
                bankroll_before,
                bankroll_after: bankroll_before,
                running_count,
                true_count,
                decks_remaining,
                reshuffle,
                sat_out: true,
                burned_cards,
                bet: 0.0,
                bet_multiplier: 0.0,
                player_hand: vec![],
                dealer_hand: vec![],
                player_value: None,
                dealer_value: None,
                actions: vec![],
                result: None,
                profit: 0.0,
            });
        }

        let bet = if self.config.counting_enabled {
            self.betting_strategy.bet(true_count, bankroll_before)
        } else {
            self.betting_strategy.base_bet()
        };
        if !self.player.can_cover(bet) {
            warn!(bankroll = bankroll_before, bet, "out of money");
            return Err(BlackjackGameError::InsufficientFunds {
                bankroll: bankroll_before,
                bet,
            });
        }

        if reshuffle {
            self.table.reshuffle();
        }

        let mut player_hand = Hand::with_wager(bet);
        let mut dealer_hand = Hand::new();
        for _ in 0..2 {
            self.table.deal_to(&mut player_hand)?;
            self.table.deal_to(&mut dealer_hand)?;
        }

        let mut actions = vec![];
        let result = match (player_hand.is_blackjack(), dealer_hand.is_blackjack()) {
            (true, true) => HandResult::Push,
            (true, false) => HandResult::PlayerBlackjack,
            (false, true) => HandResult::DealerBlackjack,
            (false, false) => {
                let upcard = dealer_hand.cards()[0].value();
                self.play_player_turn(&mut player_hand, upcard, &mut actions)?;
                if !player_hand.is_busted() {
                    self.table.play_dealer(&mut dealer_hand)?;
                }
                Self::settle(&player_hand, &dealer_hand)
            }
        };

        let wager = player_hand.wager();
        let profit = result.profit(wager);
        self.player.settle(profit);
        self.stats.record(result, wager);
        debug!(
            hand_number,
            ?result,
            wager,
            profit,
            bankroll = self.player.bankroll(),
            "hand resolved"
        );

        Ok(HandOutcome {
            hand_number,
            bankroll_before,
            bankroll_after: self.player.bankroll(),
            running_count,
            true_count,
            decks_remaining,
            reshuffle,
            sat_out: false,
            burned_cards: vec![],
            bet: wager,
            bet_multiplier: bet / self.betting_strategy.base_bet(),
            player_value: Some(player_hand.value()),
            dealer_value: Some(dealer_hand.value()),
            player_hand: player_hand.cards().to_vec(),
            dealer_hand: dealer_hand.cards().to_vec(),
            actions,
            result: Some(result),
            profit,
        })
    }

    /// Plays the player's hand by the decision strategy until it stands, doubles or busts.
    /// Split pairs are never played out, the strategy is asked with splitting disallowed.
    fn play_player_turn(
        &mut self,
        hand: &mut Hand,
        upcard: u8,
        actions: &mut Vec<Action>,
    ) -> Result<(), BlackjackGameError> {
        if hand.is_splittable() {
            debug!(hand = %hand, "pair resolved without splitting");
        }
        loop {
            let can_double = self.can_double(hand);
            let action = self
                .decision_strategy
                .decide(hand, upcard, can_double, false);
            actions.push(action);
            match action {
                Action::Stand => return Ok(()),
                Action::Double if can_double => {
                    hand.double_down();
                    self.table.deal_to(hand)?;
                    return Ok(());
                }
                // A double that is not allowed is played as a hit
                Action::Hit | Action::Double => {
                    self.table.deal_to(hand)?;
                    if hand.is_busted() {
                        return Ok(());
                    }
                }
                Action::Split => return Err(BlackjackGameError::IllegalAction(Action::Split)),
            }
        }
    }

    /// Doubling needs a two card hand and a bankroll that covers the current wager.
    fn can_double(&self, hand: &Hand) -> bool {
        hand.len() == 2 && self.player.can_cover(hand.wager())
    }

    fn settle(player: &Hand, dealer: &Hand) -> HandResult {
        if player.is_busted() {
            HandResult::PlayerBust
        } else if dealer.is_busted() || player.value() > dealer.value() {
            HandResult::PlayerWin
        } else if player.value() < dealer.value() {
            HandResult::DealerWin
        } else {
            HandResult::Push
        }
    }

    /// Plays until `target_hands` more hands were played, `max_attempts` rounds were attempted, or the bankroll
    /// can no longer cover a bet. `on_hand` sees every round, sat out ones included.
    pub fn run<F: FnMut(&HandOutcome)>(
        &mut self,
        target_hands: u32,
        max_attempts: u32,
        mut on_hand: F,
    ) -> Result<RunSummary, BlackjackGameError> {
        let start = self.stats.hands_played;
        let mut summary = RunSummary::default();
        while self.stats.hands_played - start < target_hands && summary.attempts < max_attempts {
            summary.attempts += 1;
            match self.play_one_hand() {
                Ok(outcome) => on_hand(&outcome),
                Err(e) if e.is_out_of_funds() => {
                    summary.ended_early = true;
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        summary.hands_played = self.stats.hands_played - start;
        Ok(summary)
    }

    pub fn session_stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn stats(&self) -> StatsSnapshot {
        let profit = self.player.profit();
        StatsSnapshot {
            hands_played: self.stats.hands_played,
            hands_won: self.stats.hands_won,
            hands_lost: self.stats.hands_lost,
            hands_pushed: self.stats.hands_pushed,
            hands_sat_out: self.stats.hands_sat_out,
            total_opportunities: self.stats.opportunities(),
            total_wagered: self.stats.total_wagered,
            bankroll: self.player.bankroll(),
            starting_bankroll: self.player.starting_bankroll(),
            max_bankroll: self.player.max_bankroll(),
            min_bankroll: self.player.min_bankroll(),
            profit,
            roi: roi(profit, self.stats.total_wagered),
            running_count: self.table.running_count(),
            true_count: self.table.true_count(),
            decks_remaining: self.table.decks_remaining(),
        }
    }
}
