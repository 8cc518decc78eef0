//! Multiplayer ELO rating computation and storage
//!
//! This module provides the pairwise-decomposition rating engine for games
//! with 2..N participants and exactly one winner, plus the materialized
//! rating store derived from the game ledger.

pub mod engine;
pub mod store;

// Re-export commonly used types
pub use engine::{PairwiseEloEngine, ParticipantDeltas, ParticipantRatings, RatingEngine};
pub use store::{InMemoryRatingStore, RatingStore};
