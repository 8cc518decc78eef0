//! Append-only game ledger
//!
//! The ledger is the source of truth for everything in this crate: every
//! committed game and every per-participant rating delta lives here, in
//! insertion order, forever. There is no update or delete operation by
//! design; corrections are new compensating records.

pub mod jsonl;
pub mod memory;

// Re-export commonly used types
pub use jsonl::JsonlGameLedger;
pub use memory::InMemoryGameLedger;

use crate::error::Result;
use crate::types::{GameDraft, GameRecord};

/// Trait for append-only game record storage
pub trait GameLedger: Send + Sync {
    /// Append one game atomically and return the committed record with its
    /// assigned monotonically increasing id. Either the full record with all
    /// participant deltas is stored, or none of it.
    fn append(&self, draft: GameDraft) -> Result<GameRecord>;

    /// All records in insertion (chronological submission) order
    fn records(&self) -> Result<Vec<GameRecord>>;

    /// Number of committed records
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Records involving the given player, in insertion order
    fn by_player(&self, player_id: &str) -> Result<Vec<GameRecord>> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|record| record.has_participant(player_id))
            .collect())
    }
}
