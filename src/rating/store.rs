//! Materialized rating store derived from the game ledger
//!
//! The store caches "baseline + sum of deltas so far" for every player and
//! every (player, deck) pair. It is never the source of truth: a full ledger
//! replay via [`RatingStore::rebuild`] must reproduce it exactly, and on any
//! detected divergence the ledger wins.

use crate::error::{LedgerError, Result};
use crate::ledger::GameLedger;
use crate::types::{DeckId, PlayerId, RatingTarget};
use std::collections::HashMap;
use std::sync::RwLock;

/// Trait for rating cache operations
pub trait RatingStore: Send + Sync {
    /// Current overall rating for a player; baseline if they have no history
    fn player_rating(&self, player_id: &str) -> Result<f64>;

    /// Current rating for a (player, deck) pair; baseline if unplayed
    fn deck_rating(&self, player_id: &str, deck_id: &str) -> Result<f64>;

    /// Add a delta to one target's stored rating.
    ///
    /// Used only by the submission service immediately after a successful
    /// ledger append.
    fn apply(&self, target: &RatingTarget, delta: f64) -> Result<()>;

    /// Recompute every rating from scratch by folding the full ledger from
    /// each entity's baseline. Used for recovery and as a consistency check.
    fn rebuild(&self, ledger: &dyn GameLedger) -> Result<()>;

    /// Snapshot of all player ratings with at least one game
    fn player_ratings(&self) -> Result<HashMap<PlayerId, f64>>;

    /// Snapshot of all (player, deck) ratings with at least one game
    fn deck_ratings(&self) -> Result<HashMap<(PlayerId, DeckId), f64>>;
}

/// In-memory rating store implementation
#[derive(Debug)]
pub struct InMemoryRatingStore {
    baseline: f64,
    players: RwLock<HashMap<PlayerId, f64>>,
    decks: RwLock<HashMap<(PlayerId, DeckId), f64>>,
}

impl InMemoryRatingStore {
    /// Create an empty store where every entity starts at `baseline`
    pub fn new(baseline: f64) -> Self {
        Self {
            baseline,
            players: RwLock::new(HashMap::new()),
            decks: RwLock::new(HashMap::new()),
        }
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    fn lock_error(what: &str) -> LedgerError {
        LedgerError::InternalError {
            message: format!("failed to acquire {} lock", what),
        }
    }
}

impl RatingStore for InMemoryRatingStore {
    fn player_rating(&self, player_id: &str) -> Result<f64> {
        let players = self
            .players
            .read()
            .map_err(|_| Self::lock_error("player ratings"))?;
        Ok(players.get(player_id).copied().unwrap_or(self.baseline))
    }

    fn deck_rating(&self, player_id: &str, deck_id: &str) -> Result<f64> {
        let decks = self
            .decks
            .read()
            .map_err(|_| Self::lock_error("deck ratings"))?;
        Ok(decks
            .get(&(player_id.to_string(), deck_id.to_string()))
            .copied()
            .unwrap_or(self.baseline))
    }

    fn apply(&self, target: &RatingTarget, delta: f64) -> Result<()> {
        match target {
            RatingTarget::Player(player_id) => {
                let mut players = self
                    .players
                    .write()
                    .map_err(|_| Self::lock_error("player ratings"))?;
                *players.entry(player_id.clone()).or_insert(self.baseline) += delta;
            }
            RatingTarget::PlayerDeck(player_id, deck_id) => {
                let mut decks = self
                    .decks
                    .write()
                    .map_err(|_| Self::lock_error("deck ratings"))?;
                *decks
                    .entry((player_id.clone(), deck_id.clone()))
                    .or_insert(self.baseline) += delta;
            }
        }
        Ok(())
    }

    fn rebuild(&self, ledger: &dyn GameLedger) -> Result<()> {
        let mut players: HashMap<PlayerId, f64> = HashMap::new();
        let mut decks: HashMap<(PlayerId, DeckId), f64> = HashMap::new();

        for record in ledger.records()? {
            for participant in &record.participants {
                *players
                    .entry(participant.player_id.clone())
                    .or_insert(self.baseline) += participant.player_delta;
                *decks
                    .entry((participant.player_id.clone(), participant.deck_id.clone()))
                    .or_insert(self.baseline) += participant.deck_delta;
            }
        }

        let mut player_guard = self
            .players
            .write()
            .map_err(|_| Self::lock_error("player ratings"))?;
        let mut deck_guard = self
            .decks
            .write()
            .map_err(|_| Self::lock_error("deck ratings"))?;
        *player_guard = players;
        *deck_guard = decks;
        Ok(())
    }

    fn player_ratings(&self) -> Result<HashMap<PlayerId, f64>> {
        let players = self
            .players
            .read()
            .map_err(|_| Self::lock_error("player ratings"))?;
        Ok(players.clone())
    }

    fn deck_ratings(&self) -> Result<HashMap<(PlayerId, DeckId), f64>> {
        let decks = self
            .decks
            .read()
            .map_err(|_| Self::lock_error("deck ratings"))?;
        Ok(decks.clone())
    }
}
