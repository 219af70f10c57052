use crate::game::outcome::{HandOutcome, HandResult};
use crate::stats::StatsSnapshot;
use bj_core::{Card, Hand};
use std::io::Write;

const WIDTH: usize = 60;

fn join_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

fn describe(result: HandResult, profit: f64) -> String {
    match result {
        HandResult::PlayerBlackjack => format!("blackjack pays 3:2, profit ${:.2}", profit),
        HandResult::PlayerWin => format!("player wins, profit ${:.2}", profit),
        HandResult::Push => String::from("push"),
        HandResult::DealerBlackjack => format!("dealer blackjack, loss ${:.2}", -profit),
        HandResult::PlayerBust => format!("player busts, loss ${:.2}", -profit),
        HandResult::DealerWin => format!("dealer wins, loss ${:.2}", -profit),
    }
}

/// Writes a full report of one round to `writer`.
pub fn write_hand(mut writer: impl Write, outcome: &HandOutcome) -> std::io::Result<()> {
    if outcome.reshuffle {
        writeln!(writer, "{}", "~".repeat(WIDTH))?;
        writeln!(writer, "reshuffling shoe, count reset to 0")?;
        writeln!(writer, "{}", "~".repeat(WIDTH))?;
    }
    writeln!(writer, "{:=^WIDTH$}", format!(" hand #{} ", outcome.hand_number))?;
    writeln!(
        writer,
        "running count: {:+} | true count: {:+.1} | decks remaining: {:.1}",
        outcome.running_count, outcome.true_count, outcome.decks_remaining
    )?;

    if outcome.sat_out {
        writeln!(writer, "count too negative, sitting out")?;
        writeln!(writer, "cards seen: {}", join_cards(&outcome.burned_cards))?;
        return Ok(());
    }

    writeln!(writer, "bankroll: ${:.2}", outcome.bankroll_before)?;
    writeln!(
        writer,
        "bet: ${:.2} ({}x)",
        outcome.bet, outcome.bet_multiplier
    )?;
    let player = Hand::from_cards(outcome.player_hand.iter().copied());
    let dealer = Hand::from_cards(outcome.dealer_hand.iter().copied());
    writeln!(writer, "player hand: {}", player)?;
    writeln!(writer, "dealer hand: {}", dealer)?;
    if !outcome.actions.is_empty() {
        let actions = outcome
            .actions
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<String>>()
            .join(" -> ");
        writeln!(writer, "actions: {}", actions)?;
    }
    if let Some(result) = outcome.result {
        writeln!(writer, "result: {}", describe(result, outcome.profit))?;
    }
    writeln!(writer, "bankroll after: ${:.2}", outcome.bankroll_after)?;
    Ok(())
}

/// Writes the session statistics table to `writer`.
pub fn write_summary(mut writer: impl Write, stats: &StatsSnapshot) -> std::io::Result<()> {
    writeln!(writer, "{}", stats)
}
