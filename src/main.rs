//! Command-line entry point for pod-ledger
//!
//! Wires the roster, ledger, rating store and submission service together
//! and exposes the read and write APIs as subcommands over a JSONL ledger
//! file.

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use pod_ledger::config::{validate_config, AppConfig};
use pod_ledger::ledger::{GameLedger, InMemoryGameLedger, JsonlGameLedger};
use pod_ledger::rating::{InMemoryRatingStore, PairwiseEloEngine, RatingStore};
use pod_ledger::roster::StaticRosterProvider;
use pod_ledger::stats::{LeaderboardScope, StatsAggregator};
use pod_ledger::submission::GameSubmissionService;
use pod_ledger::types::{GameSubmission, SubmissionEntry};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Pod Ledger - Game result ledger and ELO ranking for card-game pods
#[derive(Parser)]
#[command(
    name = "pod-ledger",
    version,
    about = "Append-only game ledger and multiplayer ELO ranking engine",
    long_about = "Pod Ledger records multiplayer card-game results in an append-only ledger \
                 and derives per-player and per-deck ELO rankings, streaks and matchup \
                 statistics from it."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Ledger file override
    #[arg(long, value_name = "FILE", help = "Override ledger file path")]
    ledger: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without running a command")]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a game result
    Submit {
        /// Game date (YYYY-MM-DD, defaults to today)
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,
        /// Winner's player id
        #[arg(long, value_name = "PLAYER")]
        winner: String,
        /// Participants as player=deck pairs
        #[arg(required = true, value_name = "PLAYER=DECK")]
        participants: Vec<String>,
    },
    /// Show the leaderboard
    Leaderboard {
        /// Rank (player, deck) pairs instead of players
        #[arg(long)]
        decks: bool,
    },
    /// Show game history
    History {
        /// Only games involving this player
        #[arg(long, value_name = "PLAYER")]
        player: Option<String>,
    },
    /// Show a player's summary with per-deck breakdown
    Summary { player: String },
    /// Show a player's current and longest streaks
    Streaks { player: String },
    /// Show head-to-head statistics between two players
    Matchup {
        player: String,
        opponent: String,
        /// Only games where the opponent piloted this deck
        #[arg(long, value_name = "DECK")]
        deck: Option<String>,
    },
    /// Rebuild the rating store from the ledger and report divergence
    Rebuild,
    /// Export the ledger and current ratings as JSON
    Export,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;
    Ok(())
}

#[derive(Serialize)]
struct ExportRating<'a> {
    player: &'a str,
    deck: Option<&'a str>,
    rating: f64,
}

fn parse_participant(raw: &str) -> Result<SubmissionEntry> {
    let (player, deck) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected PLAYER=DECK, got {}", raw))?;
    Ok(SubmissionEntry {
        player_id: player.to_string(),
        deck_id: deck.to_string(),
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    config.apply_env_overrides();
    if let Some(level) = &args.log_level {
        config.service.log_level = level.clone();
    }
    if let Some(path) = &args.ledger {
        config.storage.ledger_path = Some(path.clone());
    }
    validate_config(&config)?;

    init_logging(&config.service.log_level)?;

    if args.dry_run {
        println!("Configuration is valid");
        return Ok(());
    }

    let ledger: Arc<dyn GameLedger> = match &config.storage.ledger_path {
        Some(path) => Arc::new(JsonlGameLedger::open(path)?),
        None => Arc::new(InMemoryGameLedger::new()),
    };

    let roster = Arc::new(StaticRosterProvider::from_settings(&config.roster)?);
    let store = Arc::new(InMemoryRatingStore::new(config.rating.baseline_rating));
    store.rebuild(ledger.as_ref())?;
    info!(games = ledger.len()?, "rating store rebuilt from ledger");

    let aggregator = StatsAggregator::new(ledger.clone(), config.rating.baseline_rating);
    let service = GameSubmissionService::new(
        roster,
        ledger.clone(),
        store.clone(),
        Arc::new(PairwiseEloEngine::new()),
        config.rating.clone(),
    );

    match args.command {
        None => {
            println!("No command given; see --help");
        }
        Some(Command::Submit {
            date,
            winner,
            participants,
        }) => {
            let entries = participants
                .iter()
                .map(|raw| parse_participant(raw))
                .collect::<Result<Vec<_>>>()?;
            let submission = GameSubmission::new(
                date.unwrap_or_else(|| Utc::now().date_naive()),
                entries,
                winner,
            );
            let record = service.submit(submission)?;
            println!("Game #{} recorded ({})", record.id, record.date);
            for participant in &record.participants {
                println!(
                    "  {} ({}): {:+.2} player, {:+.2} deck",
                    participant.player_id,
                    participant.deck_id,
                    participant.player_delta,
                    participant.deck_delta
                );
            }
        }
        Some(Command::Leaderboard { decks }) => {
            let scope = if decks {
                LeaderboardScope::PlayerDeck
            } else {
                LeaderboardScope::Player
            };
            for (rank, row) in aggregator.leaderboard(scope)?.iter().enumerate() {
                println!("{:>3}. {:<30} {:.2}", rank + 1, row.target.to_string(), row.rating);
            }
        }
        Some(Command::History { player }) => {
            let records = match player {
                Some(player) => ledger.by_player(&player)?,
                None => ledger.records()?,
            };
            for record in records {
                let field: Vec<String> = record
                    .participants
                    .iter()
                    .map(|p| format!("{} ({}) {:+.2}", p.player_id, p.deck_id, p.player_delta))
                    .collect();
                println!(
                    "#{} {} winner={} | {}",
                    record.id,
                    record.date,
                    record.winner_id,
                    field.join(", ")
                );
            }
        }
        Some(Command::Summary { player }) => {
            let summary = aggregator.player_summary(&player)?;
            println!(
                "{}: rating {:.2}, {} games, {:.0}% win rate",
                summary.player_id,
                summary.current_rating,
                summary.games_played,
                summary.win_rate * 100.0
            );
            for deck in &summary.decks {
                println!(
                    "  {}: rating {:.2}, {} games, {:.0}% win rate",
                    deck.deck_id,
                    deck.rating,
                    deck.games_played,
                    deck.win_rate * 100.0
                );
            }
        }
        Some(Command::Streaks { player }) => {
            let streaks = aggregator.streaks(&player)?;
            match streaks.current {
                Some(streak) => println!(
                    "Current streak: {} {:?}",
                    streak.length, streak.kind
                ),
                None => println!("No games recorded"),
            }
            println!("Longest win streak: {}", streaks.longest_win);
            println!("Longest loss streak: {}", streaks.longest_loss);
        }
        Some(Command::Matchup {
            player,
            opponent,
            deck,
        }) => {
            let matchup = aggregator.matchup(&player, &opponent, deck.as_deref())?;
            println!(
                "{} vs {}: {} shared games, {} wins ({:.0}%), rating sum {:+.2}",
                matchup.player_id,
                matchup.opponent_id,
                matchup.games.len(),
                matchup.wins,
                matchup.win_rate * 100.0,
                matchup.rating_delta_sum
            );
        }
        Some(Command::Rebuild) => {
            let diverged = service.verify_consistency()?;
            if diverged {
                println!("Store diverged from ledger; rebuilt");
            } else {
                println!("Store consistent with ledger");
            }
        }
        Some(Command::Export) => {
            let mut ratings: Vec<ExportRating> = Vec::new();
            let player_ratings = store.player_ratings()?;
            let deck_ratings = store.deck_ratings()?;
            for (player, rating) in &player_ratings {
                ratings.push(ExportRating {
                    player: player.as_str(),
                    deck: None,
                    rating: *rating,
                });
            }
            for ((player, deck), rating) in &deck_ratings {
                ratings.push(ExportRating {
                    player: player.as_str(),
                    deck: Some(deck.as_str()),
                    rating: *rating,
                });
            }
            let document = serde_json::json!({
                "version": pod_ledger::VERSION,
                "games": ledger.records()?,
                "ratings": ratings,
            });
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    Ok(())
}
