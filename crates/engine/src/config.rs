//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the swap engine and keeper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Oracle prices older than this (relative to block time) are treated as unavailable.
    pub max_oracle_age_secs: u64,
    /// Reserve snapshots kept per pool.
    pub snapshot_retention: usize,
    /// Default TWAP window.
    pub twap_lookback_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_oracle_age_secs: 900, // 15 minutes
            snapshot_retention: 256,
            twap_lookback_secs: 900,
        }
    }
}

impl EngineConfig {
    /// Parses a JSON configuration; missing fields take their defaults.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the max oracle age.
    #[must_use]
    pub fn with_max_oracle_age(mut self, secs: u64) -> Self {
        self.max_oracle_age_secs = secs;
        self
    }

    /// Sets the snapshot retention.
    #[must_use]
    pub fn with_snapshot_retention(mut self, retention: usize) -> Self {
        self.snapshot_retention = retention;
        self
    }

    /// Sets the TWAP lookback window.
    #[must_use]
    pub fn with_twap_lookback(mut self, secs: u64) -> Self {
        self.twap_lookback_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json(r#"{"max_oracle_age_secs": 60}"#).unwrap();
        assert_eq!(config.max_oracle_age_secs, 60);
        assert_eq!(config.snapshot_retention, 256);
        assert_eq!(config.twap_lookback_secs, 900);
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::default()
            .with_max_oracle_age(30)
            .with_snapshot_retention(4)
            .with_twap_lookback(120);
        assert_eq!(config.max_oracle_age_secs, 30);
        assert_eq!(config.snapshot_retention, 4);
        assert_eq!(config.twap_lookback_secs, 120);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(EngineConfig::from_json("{").is_err());
    }
}
