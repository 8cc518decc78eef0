//! In-memory ledger implementation

use crate::error::{LedgerError, Result};
use crate::ledger::GameLedger;
use crate::types::{GameDraft, GameRecord};
use std::sync::RwLock;

/// In-memory append-only game ledger
#[derive(Debug, Default)]
pub struct InMemoryGameLedger {
    records: RwLock<Vec<GameRecord>>,
}

impl InMemoryGameLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_error() -> LedgerError {
        LedgerError::InternalError {
            message: "failed to acquire ledger lock".to_string(),
        }
    }
}

impl GameLedger for InMemoryGameLedger {
    fn append(&self, draft: GameDraft) -> Result<GameRecord> {
        let mut records = self.records.write().map_err(|_| Self::lock_error())?;
        let record = GameRecord {
            id: records.len() as u64 + 1,
            date: draft.date,
            submitted_at: draft.submitted_at,
            participants: draft.participants,
            winner_id: draft.winner_id,
        };
        records.push(record.clone());
        Ok(record)
    }

    fn records(&self) -> Result<Vec<GameRecord>> {
        let records = self.records.read().map_err(|_| Self::lock_error())?;
        Ok(records.clone())
    }

    fn len(&self) -> Result<usize> {
        let records = self.records.read().map_err(|_| Self::lock_error())?;
        Ok(records.len())
    }
}
