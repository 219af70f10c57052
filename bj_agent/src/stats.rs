use crate::game::outcome::HandResult;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Hand tallies for a whole session.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionStats {
    pub hands_played: u32,
    pub hands_won: u32,
    pub hands_lost: u32,
    pub hands_pushed: u32,
    pub hands_sat_out: u32,
    pub total_wagered: f64,
}

impl SessionStats {
    /// Records a resolved hand.
    pub fn record(&mut self, result: HandResult, wager: f64) {
        self.hands_played += 1;
        if result.is_win() {
            self.hands_won += 1;
        } else if result.is_loss() {
            self.hands_lost += 1;
        } else {
            self.hands_pushed += 1;
        }
        self.total_wagered += wager;
    }

    pub fn record_sat_out(&mut self) {
        self.hands_sat_out += 1;
    }

    /// Rounds dealt while the player was at the table, played or sat out.
    pub fn opportunities(&self) -> u32 {
        self.hands_played + self.hands_sat_out
    }
}

/// Point in time view of a session, as served to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub hands_played: u32,
    pub hands_won: u32,
    pub hands_lost: u32,
    pub hands_pushed: u32,
    pub hands_sat_out: u32,
    pub total_opportunities: u32,
    pub total_wagered: f64,
    pub bankroll: f64,
    pub starting_bankroll: f64,
    pub max_bankroll: f64,
    pub min_bankroll: f64,
    pub profit: f64,
    pub roi: f64,
    pub running_count: i32,
    pub true_count: f64,
    pub decks_remaining: f64,
}

/// Profit per unit wagered, zero before anything was wagered.
pub fn roi(profit: f64, total_wagered: f64) -> f64 {
    if total_wagered > 0.0 {
        profit / total_wagered
    } else {
        0.0
    }
}

fn rate(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64) / (whole as f64) * 100.0
    }
}

impl Display for StatsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const WIDTH: usize = 80;
        const TEXT_WIDTH: usize = "hands sat out (wonging)".len() + 20;
        const NUM_WIDTH: usize = WIDTH - TEXT_WIDTH;
        let avg_per_hand = if self.hands_played > 0 {
            self.profit / (self.hands_played as f64)
        } else {
            0.0
        };
        writeln!(f, "{:=^WIDTH$}", " session statistics ")?;
        writeln!(f, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}", "total hands dealt", self.total_opportunities)?;
        writeln!(f, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}", "hands played", self.hands_played)?;
        writeln!(
            f,
            "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}",
            "hands sat out (wonging)",
            format!(
                "{} ({:.1}%)",
                self.hands_sat_out,
                rate(self.hands_sat_out, self.total_opportunities)
            )
        )?;
        for (label, count) in [
            ("hands won", self.hands_won),
            ("hands lost", self.hands_lost),
            ("hands pushed", self.hands_pushed),
        ] {
            writeln!(
                f,
                "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}",
                label,
                format!("{} ({:.1}%)", count, rate(count, self.hands_played))
            )?;
        }
        writeln!(f, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}", "starting bankroll", self.starting_bankroll)?;
        writeln!(f, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}", "final bankroll", self.bankroll)?;
        writeln!(f, "{:<TEXT_WIDTH$}{:>+NUM_WIDTH$.2}", "total profit/loss", self.profit)?;
        writeln!(f, "{:<TEXT_WIDTH$}{:>+NUM_WIDTH$.2}", "average per hand", avg_per_hand)?;
        writeln!(f, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}", "max bankroll", self.max_bankroll)?;
        writeln!(f, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}", "min bankroll", self.min_bankroll)?;
        writeln!(f, "{:<TEXT_WIDTH$}{:>NUM_WIDTH$.2}", "total wagered", self.total_wagered)?;
        writeln!(
            f,
            "{:<TEXT_WIDTH$}{:>NUM_WIDTH$}",
            "roi",
            format!("{:+.2}%", self.roi * 100.0)
        )?;
        write!(f, "{}", "=".repeat(WIDTH))
    }
}
