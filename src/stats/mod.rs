//! Derived statistics over the game ledger
//!
//! Leaderboards, player summaries, streaks and matchup statistics, all
//! computed by folding or scanning the ledger directly so they can never
//! drift from it.

pub mod aggregator;

// Re-export commonly used types
pub use aggregator::{
    DeckBreakdown, LeaderboardRow, LeaderboardScope, MatchupSummary, PlayerSummary, StatsAggregator,
    Streak, StreakKind, StreakSummary,
};
