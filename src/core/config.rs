//! Runtime configuration
//!
//! Thresholds for the alert engine and duty rates, loaded from an optional
//! `clearops.yaml`. Every field has a default carrying the production
//! constants, so a missing or partial file is fine.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duty::DutyRates;

/// Errors loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yml::Error),
}

/// Crate-wide configuration with production defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Max shipments scanned per alert run (most recently updated first)
    pub working_set_limit: usize,

    /// Unpaid disbursement total (GNF) above which a finance alert fires
    pub unpaid_disbursement_threshold: i64,

    /// Days without any update before a shipment is flagged stale
    pub stale_after_days: i64,

    /// Days on quay after ATA before a demurrage warning
    pub demurrage_warning_days: i64,

    /// Days on quay after ATA before the demurrage danger tier
    pub demurrage_danger_days: i64,

    /// Hours before ETA within which the arrival warning fires
    pub eta_window_hours: i64,

    /// Customs duty rates used by the duty calculator
    pub duty: DutyRates,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            working_set_limit: 50,
            unpaid_disbursement_threshold: 50_000_000,
            stale_after_days: 5,
            demurrage_warning_days: 4,
            demurrage_danger_days: 7,
            eta_window_hours: 48,
            duty: DutyRates::default(),
        }
    }
}

impl Config {
    /// Load from a YAML file, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_production_constants() {
        let config = Config::default();
        assert_eq!(config.working_set_limit, 50);
        assert_eq!(config.unpaid_disbursement_threshold, 50_000_000);
        assert_eq!(config.stale_after_days, 5);
        assert_eq!(config.demurrage_warning_days, 4);
        assert_eq!(config.demurrage_danger_days, 7);
        assert_eq!(config.eta_window_hours, 48);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yml::from_str("working_set_limit: 10\n").unwrap();
        assert_eq!(config.working_set_limit, 10);
        assert_eq!(config.stale_after_days, 5);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let config = Config::load(Path::new("/nonexistent/clearops.yaml")).unwrap();
        assert_eq!(config.working_set_limit, 50);
    }
}
