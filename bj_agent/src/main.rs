use bj_agent::prelude::*;
use bj_agent::write::{write_hand, write_summary};
use clap::Parser;
use std::io::{self, BufWriter};
use tracing::{error, info, Level};

/// Plays a card counting blackjack session and prints the results.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Hands to play, rounds sat out do not count
    #[arg(long, default_value_t = 100)]
    hands: u32,

    /// Number of opening rounds reported in full
    #[arg(long, default_value_t = 5)]
    verbose_hands: u32,

    /// Seed for the shoe, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,

    #[arg(long, default_value_t = 1000.0)]
    bankroll: f64,

    #[arg(long, default_value_t = 10.0)]
    base_bet: f64,

    #[arg(long, default_value_t = 6)]
    num_decks: usize,

    #[arg(long, default_value_t = 0.75)]
    penetration: f64,

    /// Flat bet the base bet instead of ramping with the count
    #[arg(long)]
    no_counting: bool,

    /// Play every round instead of sitting out negative counts
    #[arg(long)]
    no_wonging: bool,

    #[arg(long, default_value_t = -1.0, allow_hyphen_values = true)]
    wonging_threshold: f64,

    #[arg(long, default_value_t = 10.0)]
    max_bet_multiplier: f64,
}

impl From<&Args> for SessionConfig {
    fn from(args: &Args) -> Self {
        SessionConfig::new()
            .starting_bankroll(args.bankroll)
            .base_bet(args.base_bet)
            .num_decks(args.num_decks)
            .penetration(args.penetration)
            .counting_enabled(!args.no_counting)
            .wonging_enabled(!args.no_wonging)
            .wonging_threshold(args.wonging_threshold)
            .max_bet_multiplier(args.max_bet_multiplier)
            .build()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    let config = SessionConfig::from(&args);
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut game = CountingGame::seeded(config, seed)?;
    info!(
        seed,
        bankroll = config.starting_bankroll,
        base_bet = config.base_bet,
        counting = config.counting_enabled,
        wonging = config.wonging_enabled,
        "starting session"
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    // At most three rounds per requested hand are dealt, the verbose ones included
    let max_attempts = args.hands.saturating_mul(3);
    let mut attempts = 0;
    while attempts < args.verbose_hands.min(max_attempts) {
        attempts += 1;
        match game.play_one_hand() {
            Ok(outcome) => write_hand(&mut out, &outcome)?,
            Err(e) if e.is_out_of_funds() => {
                info!("out of money");
                break;
            }
            Err(e) => {
                error!(%e, "session aborted");
                return Err(e.into());
            }
        }
    }

    let remaining = args
        .hands
        .saturating_sub(game.session_stats().hands_played);
    let summary = game.run(remaining, max_attempts - attempts, |_| {})?;
    if summary.ended_early {
        info!(attempts = summary.attempts, "out of money");
    }

    write_summary(&mut out, &game.stats())?;
    Ok(())
}
