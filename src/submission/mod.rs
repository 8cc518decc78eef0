//! Game submission orchestration
//!
//! The single write path into the system: validate a candidate game, compute
//! rating deltas, append to the ledger and update the rating store as one
//! logical unit.

pub mod service;

// Re-export commonly used types
pub use service::GameSubmissionService;
