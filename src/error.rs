//! Error types for the pod-ledger rating system
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the crate.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific ledger and rating scenarios
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid game submission: {reason}")]
    Validation { reason: String },

    #[error("Rating calculation failed: {reason}")]
    RatingCalculationFailed { reason: String },

    #[error("Ledger/store divergence: {message}")]
    Consistency { message: String },

    #[error("Corrupt ledger entry at record {record}: {message}")]
    CorruptLedger { record: u64, message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl LedgerError {
    /// Shorthand for a validation rejection
    pub fn validation(reason: impl Into<String>) -> Self {
        LedgerError::Validation {
            reason: reason.into(),
        }
    }

    /// True if this error is a submitter-facing validation rejection
    pub fn is_validation(&self) -> bool {
        matches!(self, LedgerError::Validation { .. })
    }
}
