//! Roster of players and decks
//!
//! The roster is an external collaborator to the core: submission validation
//! consults it, but nothing in the ledger or rating path mutates it.

pub mod provider;

// Re-export commonly used types
pub use provider::{RosterProvider, StaticRosterProvider};
