use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::planner::constants::{
    DEFAULT_BALANCED_PRICE_WEIGHT, DEFAULT_BALANCED_SUSTAINABILITY_WEIGHT, DEFAULT_CURRENCY_UNIT,
    DEFAULT_LOOKUP_TIMEOUT_MS, DEFAULT_MAX_TABLE_CELLS, DEFAULT_PREFERENCE_BOOST,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("currency_unit must be a positive finite number, got {0}")]
    InvalidCurrencyUnit(f64),

    #[error("max_table_cells must be greater than zero")]
    ZeroTableCeiling,

    #[error("lookup_timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("preference_boost must be a non-negative finite number, got {0}")]
    InvalidBoost(f64),

    #[error("balanced weights must be non-negative, finite and not both zero")]
    InvalidWeights,

    #[error("failed to read config file: {0}")]
    Read(String),
}

/// Tunables for scoring, solving and catalog access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Coarsest budget axis granularity for the DP, in currency units.
    pub currency_unit: f64,
    /// DP size ceiling in bytes (take flags plus the best row); larger
    /// problems use the greedy approximation.
    pub max_table_cells: usize,
    pub lookup_timeout_ms: u64,
    /// Multiplicative boost for preference matches (0.10 = +10%).
    pub preference_boost: f64,
    pub balanced_price_weight: f64,
    pub balanced_sustainability_weight: f64,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            currency_unit: DEFAULT_CURRENCY_UNIT,
            max_table_cells: DEFAULT_MAX_TABLE_CELLS,
            lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT_MS,
            preference_boost: DEFAULT_PREFERENCE_BOOST,
            balanced_price_weight: DEFAULT_BALANCED_PRICE_WEIGHT,
            balanced_sustainability_weight: DEFAULT_BALANCED_SUSTAINABILITY_WEIGHT,
            log_level: "warn".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file; absent fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.currency_unit.is_finite() || self.currency_unit <= 0.0 {
            return Err(ConfigError::InvalidCurrencyUnit(self.currency_unit));
        }
        if self.max_table_cells == 0 {
            return Err(ConfigError::ZeroTableCeiling);
        }
        if self.lookup_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if !self.preference_boost.is_finite() || self.preference_boost < 0.0 {
            return Err(ConfigError::InvalidBoost(self.preference_boost));
        }
        let valid = |w: f64| w.is_finite() && w >= 0.0;
        if !valid(self.balanced_price_weight)
            || !valid(self.balanced_sustainability_weight)
            || self.balanced_price_weight + self.balanced_sustainability_weight <= 0.0
        {
            return Err(ConfigError::InvalidWeights);
        }
        Ok(())
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.currency_unit, 1.0);
        assert_eq!(config.lookup_timeout(), Duration::from_millis(2_000));
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"currency_unit": 10, "preference_boost": 0.25}"#)
            .unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.currency_unit, 10.0);
        assert_eq!(config.preference_boost, 0.25);
        assert_eq!(config.max_table_cells, DEFAULT_MAX_TABLE_CELLS);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"currency_unit": 0}"#).unwrap();

        assert_eq!(
            EngineConfig::load(file.path()),
            Err(ConfigError::InvalidCurrencyUnit(0.0))
        );
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            EngineConfig::load("/nonexistent/engine.json"),
            Err(ConfigError::Read(_))
        ));
    }
}
