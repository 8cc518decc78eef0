//! Rating system configuration

use serde::{Deserialize, Serialize};

/// Parameters of the multiplayer ELO rating system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingConfig {
    /// K-factor scaling the magnitude of every rating update
    pub k_factor: f64,
    /// Rating assigned to any player or (player, deck) pair with no prior games
    pub baseline_rating: f64,
    /// Decimal places deltas are rounded to before persistence
    pub decimal_places: u32,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k_factor: 32.0,
            baseline_rating: 1000.0,
            decimal_places: 2,
        }
    }
}

impl RatingConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.k_factor <= 0.0 {
            return Err(crate::error::LedgerError::ConfigurationError {
                message: "K-factor must be positive".to_string(),
            }
            .into());
        }
        if !self.baseline_rating.is_finite() {
            return Err(crate::error::LedgerError::ConfigurationError {
                message: "Baseline rating must be finite".to_string(),
            }
            .into());
        }
        if self.decimal_places > 6 {
            return Err(crate::error::LedgerError::ConfigurationError {
                message: "Decimal places must be at most 6".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
