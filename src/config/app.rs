//! Main application configuration
//!
//! This module defines the primary configuration structures for pod-ledger,
//! including TOML file loading, environment variable overrides and validation.

use crate::config::rating::RatingConfig;
use crate::types::{Deck, Player};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
    pub storage: StorageSettings,
    pub roster: RosterSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Ledger persistence settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Path of the append-only JSONL ledger file; `None` keeps the ledger in memory
    pub ledger_path: Option<PathBuf>,
}

/// Static roster consumed by submission validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterSettings {
    pub players: Vec<Player>,
    pub decks: Vec<Deck>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "pod-ledger".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides on top of the current values
    pub fn apply_env_overrides(&mut self) {
        if let Ok(name) = env::var("POD_LEDGER_SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(level) = env::var("POD_LEDGER_LOG_LEVEL") {
            self.service.log_level = level;
        }
        if let Ok(path) = env::var("POD_LEDGER_FILE") {
            self.storage.ledger_path = Some(PathBuf::from(path));
        }
        if let Ok(k) = env::var("POD_LEDGER_K_FACTOR") {
            if let Ok(k) = k.parse() {
                self.rating.k_factor = k;
            }
        }
        if let Ok(baseline) = env::var("POD_LEDGER_BASELINE_RATING") {
            if let Ok(baseline) = baseline.parse() {
                self.rating.baseline_rating = baseline;
            }
        }
    }
}

/// Validate a complete application configuration
pub fn validate_config(config: &AppConfig) -> Result<()> {
    config.rating.validate()?;

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.service.log_level.as_str()) {
        return Err(crate::error::LedgerError::ConfigurationError {
            message: format!("invalid log level: {}", config.service.log_level),
        }
        .into());
    }

    let mut names: Vec<&str> = config.roster.players.iter().map(|p| p.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    if names.len() != config.roster.players.len() {
        return Err(crate::error::LedgerError::ConfigurationError {
            message: "roster player display names must be unique".to_string(),
        }
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.service.name, "pod-ledger");
        assert!(config.storage.ledger_path.is_none());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = AppConfig::default();
        config.service.log_level = "verbose".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_duplicate_player_names_rejected() {
        let mut config = AppConfig::default();
        config.roster.players = vec![
            Player {
                id: "p1".to_string(),
                name: "Alice".to_string(),
            },
            Player {
                id: "p2".to_string(),
                name: "Alice".to_string(),
            },
        ];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let raw = r#"
            [service]
            log_level = "debug"

            [rating]
            k_factor = 24.0
            baseline_rating = 1200.0
            decimal_places = 2

            [[roster.players]]
            id = "p1"
            name = "Alice"

            [[roster.decks]]
            id = "d1"
            name = "Dragons"
        "#;
        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.service.log_level, "debug");
        assert_eq!(config.rating.k_factor, 24.0);
        assert_eq!(config.roster.players.len(), 1);
        assert_eq!(config.roster.decks[0].name, "Dragons");
        assert!(validate_config(&config).is_ok());
    }
}
