//! Game submission service
//!
//! Orchestrates one write transaction through the stages
//! `Received -> Validated -> RatingComputed -> Persisted`, or
//! `Received -> Rejected` on validation failure. The
//! read-compute-append-apply region runs under a single writer lock so no
//! two submissions ever compute deltas from the same stale ratings.

use crate::config::RatingConfig;
use crate::error::{LedgerError, Result};
use crate::ledger::GameLedger;
use crate::rating::{ParticipantRatings, RatingEngine, RatingStore};
use crate::roster::RosterProvider;
use crate::types::{GameDraft, GameRecord, GameSubmission, Participant, RatingTarget};
use crate::utils::{current_timestamp, round_to_places};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Single-writer orchestrator for game submissions
pub struct GameSubmissionService {
    roster: Arc<dyn RosterProvider>,
    ledger: Arc<dyn GameLedger>,
    store: Arc<dyn RatingStore>,
    engine: Arc<dyn RatingEngine>,
    config: RatingConfig,
    write_lock: Mutex<()>,
}

impl GameSubmissionService {
    pub fn new(
        roster: Arc<dyn RosterProvider>,
        ledger: Arc<dyn GameLedger>,
        store: Arc<dyn RatingStore>,
        engine: Arc<dyn RatingEngine>,
        config: RatingConfig,
    ) -> Self {
        Self {
            roster,
            ledger,
            store,
            engine,
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// Submit one game result.
    ///
    /// On success the committed record is returned; on a validation failure a
    /// typed `LedgerError::Validation` is returned and nothing is computed or
    /// written.
    pub fn submit(&self, submission: GameSubmission) -> Result<GameRecord> {
        let winner_index = match self.validate(&submission) {
            Ok(index) => index,
            Err(err) => {
                info!(winner = %submission.winner_id, error = %err, "submission rejected");
                return Err(err);
            }
        };
        debug!(
            participants = submission.participants.len(),
            winner = %submission.winner_id,
            "submission validated"
        );

        // Single-writer region: read ratings, compute, append, apply.
        let _guard = self.write_lock.lock().map_err(|_| {
            LedgerError::InternalError {
                message: "failed to acquire submission write lock".to_string(),
            }
        })?;

        let ratings: Vec<ParticipantRatings> = submission
            .participants
            .iter()
            .map(|entry| {
                Ok(ParticipantRatings {
                    player_rating: self.store.player_rating(&entry.player_id)?,
                    deck_rating: self.store.deck_rating(&entry.player_id, &entry.deck_id)?,
                })
            })
            .collect::<Result<_>>()?;

        let deltas = self
            .engine
            .compute(&ratings, winner_index, self.config.k_factor)?;
        debug!(winner = %submission.winner_id, "rating deltas computed");

        // Round exactly once, at the persistence boundary.
        let places = self.config.decimal_places;
        let participants: Vec<Participant> = submission
            .participants
            .iter()
            .zip(&deltas)
            .map(|(entry, delta)| Participant {
                player_id: entry.player_id.clone(),
                deck_id: entry.deck_id.clone(),
                player_delta: round_to_places(delta.player_delta, places),
                deck_delta: round_to_places(delta.deck_delta, places),
            })
            .collect();

        let record = self.ledger.append(GameDraft {
            date: submission.date,
            submitted_at: current_timestamp(),
            participants,
            winner_id: submission.winner_id.clone(),
        })?;

        if let Err(err) = self.apply_deltas(&record) {
            // The append committed, so the ledger is ahead of the store.
            // Restore the store from the ledger before surfacing anything.
            warn!(game = record.id, error = %err, "store update failed, rebuilding from ledger");
            self.store
                .rebuild(self.ledger.as_ref())
                .map_err(|rebuild_err| LedgerError::Consistency {
                    message: format!(
                        "store update failed ({}) and rebuild failed ({})",
                        err, rebuild_err
                    ),
                })?;
        }

        info!(
            game = record.id,
            winner = %record.winner_id,
            participants = record.participants.len(),
            "game persisted"
        );
        Ok(record)
    }

    /// Compare the store against a full ledger replay and rebuild it on any
    /// divergence. Returns true if a divergence was found and repaired.
    pub fn verify_consistency(&self) -> Result<bool> {
        let _guard = self.write_lock.lock().map_err(|_| {
            LedgerError::InternalError {
                message: "failed to acquire submission write lock".to_string(),
            }
        })?;

        let replay = {
            let baseline_store =
                crate::rating::InMemoryRatingStore::new(self.config.baseline_rating);
            baseline_store.rebuild(self.ledger.as_ref())?;
            (
                baseline_store.player_ratings()?,
                baseline_store.deck_ratings()?,
            )
        };

        let diverged = self.store.player_ratings()? != replay.0
            || self.store.deck_ratings()? != replay.1;
        if diverged {
            warn!("rating store diverged from ledger, rebuilding");
            self.store.rebuild(self.ledger.as_ref())?;
        }
        Ok(diverged)
    }

    fn apply_deltas(&self, record: &GameRecord) -> Result<()> {
        for participant in &record.participants {
            self.store.apply(
                &RatingTarget::Player(participant.player_id.clone()),
                participant.player_delta,
            )?;
            self.store.apply(
                &RatingTarget::PlayerDeck(
                    participant.player_id.clone(),
                    participant.deck_id.clone(),
                ),
                participant.deck_delta,
            )?;
        }
        Ok(())
    }

    /// Validate a candidate game against the roster. Returns the winner's
    /// index within the participant list.
    fn validate(&self, submission: &GameSubmission) -> Result<usize> {
        if submission.participants.len() < 2 {
            return Err(LedgerError::validation(format!(
                "at least 2 participants required, got {}",
                submission.participants.len()
            ))
            .into());
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for entry in &submission.participants {
            if !seen.insert(entry.player_id.as_str()) {
                return Err(LedgerError::validation(format!(
                    "duplicate player in game: {}",
                    entry.player_id
                ))
                .into());
            }
        }

        let winner_index = submission.winner_index().ok_or_else(|| {
            LedgerError::validation(format!(
                "winner {} is not among the participants",
                submission.winner_id
            ))
        })?;

        for entry in &submission.participants {
            if self.roster.player(&entry.player_id)?.is_none() {
                return Err(LedgerError::validation(format!(
                    "unknown player: {}",
                    entry.player_id
                ))
                .into());
            }
            let decks = self.roster.list_decks(&entry.player_id)?;
            if !decks.iter().any(|deck| deck.id == entry.deck_id) {
                return Err(LedgerError::validation(format!(
                    "unknown deck {} for player {}",
                    entry.deck_id, entry.player_id
                ))
                .into());
            }
        }

        Ok(winner_index)
    }
}
