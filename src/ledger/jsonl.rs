//! File-backed ledger implementation
//!
//! One serde-serialized `GameRecord` per line in an append-only JSONL file.
//! The full file is replayed on open; a line that fails to parse surfaces as
//! `CorruptLedger` rather than being skipped, since every derived rating
//! depends on the complete sequence.

use crate::error::{LedgerError, Result};
use crate::ledger::GameLedger;
use crate::types::{GameDraft, GameRecord};
use anyhow::Context;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use tracing::info;

/// Append-only game ledger persisted as a JSON-lines file
#[derive(Debug)]
pub struct JsonlGameLedger {
    path: PathBuf,
    records: RwLock<Vec<GameRecord>>,
    file: Mutex<File>,
}

impl JsonlGameLedger {
    /// Open (or create) a ledger file and replay its full record sequence
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            Self::replay(&path)?
        } else {
            Vec::new()
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open ledger file {}", path.display()))?;

        info!(
            path = %path.display(),
            records = records.len(),
            "opened ledger file"
        );

        Ok(Self {
            path,
            records: RwLock::new(records),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn replay(path: &Path) -> Result<Vec<GameRecord>> {
        let reader = BufReader::new(
            File::open(path)
                .with_context(|| format!("failed to read ledger file {}", path.display()))?,
        );

        let mut records: Vec<GameRecord> = Vec::new();
        for (line_number, line) in reader.lines().enumerate() {
            let line = line
                .with_context(|| format!("failed to read ledger file {}", path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            let record: GameRecord =
                serde_json::from_str(&line).map_err(|e| LedgerError::CorruptLedger {
                    record: line_number as u64 + 1,
                    message: e.to_string(),
                })?;
            if record.id != records.len() as u64 + 1 {
                return Err(LedgerError::CorruptLedger {
                    record: record.id,
                    message: format!(
                        "non-monotonic record id {} at position {}",
                        record.id,
                        records.len() + 1
                    ),
                }
                .into());
            }
            records.push(record);
        }
        Ok(records)
    }

    fn lock_error(what: &str) -> LedgerError {
        LedgerError::InternalError {
            message: format!("failed to acquire ledger {} lock", what),
        }
    }
}

impl GameLedger for JsonlGameLedger {
    fn append(&self, draft: GameDraft) -> Result<GameRecord> {
        let mut records = self
            .records
            .write()
            .map_err(|_| Self::lock_error("records"))?;
        let record = GameRecord {
            id: records.len() as u64 + 1,
            date: draft.date,
            submitted_at: draft.submitted_at,
            participants: draft.participants,
            winner_id: draft.winner_id,
        };

        // The record only joins the in-memory sequence once the line is
        // durably on disk, so a failed write leaves no partial game.
        let mut line = serde_json::to_string(&record).context("failed to serialize record")?;
        line.push('\n');

        let mut file = self.file.lock().map_err(|_| Self::lock_error("file"))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("failed to append to {}", self.path.display()))?;
        file.sync_all()
            .with_context(|| format!("failed to sync {}", self.path.display()))?;
        drop(file);

        records.push(record.clone());
        Ok(record)
    }

    fn records(&self) -> Result<Vec<GameRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| Self::lock_error("records"))?;
        Ok(records.clone())
    }

    fn len(&self) -> Result<usize> {
        let records = self
            .records
            .read()
            .map_err(|_| Self::lock_error("records"))?;
        Ok(records.len())
    }
}
