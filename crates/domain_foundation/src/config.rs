//! Foundation service configuration

use chrono::Duration;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};
use serde::Deserialize;

use core_kernel::CoreError;

// Largest whole-second value a chrono Duration can hold
const MAX_TOLERANCE_SECS: i64 = i64::MAX / 1_000;

/// Settings shared by every foundation service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FoundationConfig {
    /// Accepted skew, in seconds, between an audit date and the clock
    pub recency_tolerance_secs: u64,
}

impl Default for FoundationConfig {
    fn default() -> Self {
        Self {
            recency_tolerance_secs: 60,
        }
    }
}

impl FoundationConfig {
    /// Loads configuration from `FOUNDATION_*` environment variables
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_builder(
            config::Config::builder()
                .add_source(Environment::with_prefix("FOUNDATION").try_parsing(true)),
        )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, CoreError> {
        builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| CoreError::configuration(e.to_string()))
    }

    pub fn recency_tolerance(&self) -> Duration {
        let secs = i64::try_from(self.recency_tolerance_secs).unwrap_or(i64::MAX);
        Duration::seconds(secs.min(MAX_TOLERANCE_SECS))
    }

    pub fn with_recency_tolerance(mut self, tolerance: Duration) -> Self {
        self.recency_tolerance_secs = tolerance.num_seconds().unsigned_abs();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_one_minute() {
        let config = FoundationConfig::from_builder(config::Config::builder()).unwrap();
        assert_eq!(config, FoundationConfig::default());
        assert_eq!(config.recency_tolerance(), Duration::minutes(1));
    }

    #[test]
    fn test_override_is_applied() {
        let builder = config::Config::builder()
            .set_override("recency_tolerance_secs", 300)
            .unwrap();
        let config = FoundationConfig::from_builder(builder).unwrap();
        assert_eq!(config.recency_tolerance(), Duration::minutes(5));
    }

    #[test]
    fn test_malformed_value_is_a_configuration_error() {
        let builder = config::Config::builder()
            .set_override("recency_tolerance_secs", "soon")
            .unwrap();
        let error = FoundationConfig::from_builder(builder).unwrap_err();
        assert!(error.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_with_recency_tolerance() {
        let config = FoundationConfig::default().with_recency_tolerance(Duration::seconds(-90));
        assert_eq!(config.recency_tolerance_secs, 90);
    }
}
