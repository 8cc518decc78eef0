//! Common types used throughout the pod-ledger crate

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for players
pub type PlayerId = String;

/// Stable external reference for a deck (e.g. a card-catalog id)
pub type DeckId = String;

/// Ledger-assigned, monotonically increasing game record id
pub type GameId = u64;

/// A rostered player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Display name, unique across the roster and immutable once games reference it
    pub name: String,
}

/// A deck a player can pilot in a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
}

/// Target of a single rating delta
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingTarget {
    Player(PlayerId),
    PlayerDeck(PlayerId, DeckId),
}

impl std::fmt::Display for RatingTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingTarget::Player(player) => write!(f, "{}", player),
            RatingTarget::PlayerDeck(player, deck) => write!(f, "{}/{}", player, deck),
        }
    }
}

/// One participant of a committed game, with the deltas applied for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub player_id: PlayerId,
    pub deck_id: DeckId,
    /// Signed change to the player's overall rating, rounded to the persisted precision
    pub player_delta: f64,
    /// Signed change to the (player, deck) rating, rounded to the persisted precision
    pub deck_delta: f64,
}

/// A committed, immutable game record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    pub date: NaiveDate,
    pub submitted_at: DateTime<Utc>,
    /// Ordered participant entries; order matches the submission
    pub participants: Vec<Participant>,
    /// Winner, always one of the participants
    pub winner_id: PlayerId,
}

impl GameRecord {
    /// Participant entry for the given player, if present
    pub fn participant(&self, player_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.player_id == player_id)
    }

    /// True if the given player took part in this game
    pub fn has_participant(&self, player_id: &str) -> bool {
        self.participant(player_id).is_some()
    }

    /// True if the given player won this game
    pub fn won_by(&self, player_id: &str) -> bool {
        self.winner_id == player_id
    }
}

/// A game record as drafted by the submission service, before the ledger
/// assigns its id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDraft {
    pub date: NaiveDate,
    pub submitted_at: DateTime<Utc>,
    pub participants: Vec<Participant>,
    pub winner_id: PlayerId,
}

/// One participant of a candidate game as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionEntry {
    pub player_id: PlayerId,
    pub deck_id: DeckId,
}

/// A candidate game submitted through the write API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSubmission {
    pub date: NaiveDate,
    pub participants: Vec<SubmissionEntry>,
    pub winner_id: PlayerId,
}

impl GameSubmission {
    pub fn new(date: NaiveDate, participants: Vec<SubmissionEntry>, winner_id: PlayerId) -> Self {
        Self {
            date,
            participants,
            winner_id,
        }
    }

    /// Index of the winner within the participant list, if present
    pub fn winner_index(&self) -> Option<usize> {
        self.participants
            .iter()
            .position(|entry| entry.player_id == self.winner_id)
    }
}
