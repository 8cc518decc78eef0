//! Pod Ledger - Rating ledger for multiplayer card-game pods
//!
//! This crate records game results in an append-only ledger and derives
//! ELO-style rankings from it, at two granularities: per player and per
//! (player, deck). The ledger is the single source of truth; current
//! ratings, leaderboards, streaks and matchup statistics are all folds
//! over it.

pub mod config;
pub mod error;
pub mod ledger;
pub mod rating;
pub mod roster;
pub mod stats;
pub mod submission;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{LedgerError, Result};
pub use types::*;

// Re-export key components
pub use ledger::{GameLedger, InMemoryGameLedger, JsonlGameLedger};
pub use rating::{InMemoryRatingStore, PairwiseEloEngine, RatingEngine, RatingStore};
pub use roster::{RosterProvider, StaticRosterProvider};
pub use stats::StatsAggregator;
pub use submission::GameSubmissionService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
