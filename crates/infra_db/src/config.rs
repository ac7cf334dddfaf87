//! Storage configuration
//!
//! Settings are read from `REGISTRY_*` environment variables, e.g.
//! `REGISTRY_DATABASE_URL` and `REGISTRY_MAX_CONNECTIONS`.

use std::time::Duration;

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};
use serde::Deserialize;

use core_kernel::CoreError;

use crate::pool::DatabaseConfig;

/// Connection settings for the registry database
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// PostgreSQL connection string
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection
    pub connect_timeout_secs: u64,
    /// Log filter used by the binaries when `RUST_LOG` is unset
    pub log_level: String,
    /// `json` for JSON lines, anything else for human-readable text
    pub log_format: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/registry".to_string(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout_secs: 30,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl StorageConfig {
    /// Loads configuration from `REGISTRY_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Configuration` if a variable cannot be parsed
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_builder(
            config::Config::builder()
                .add_source(Environment::with_prefix("REGISTRY").try_parsing(true)),
        )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, CoreError> {
        builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| CoreError::configuration(e.to_string()))
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    /// Pool settings derived from this configuration
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone())
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorageConfig::from_builder(config::Config::builder()).unwrap();
        assert_eq!(config, StorageConfig::default());
        assert!(!config.json_logs());
    }

    #[test]
    fn test_overrides_flow_into_pool_settings() {
        let builder = config::Config::builder()
            .set_override("database_url", "postgres://db.internal/registry")
            .unwrap()
            .set_override("max_connections", 25)
            .unwrap()
            .set_override("connect_timeout_secs", 5)
            .unwrap();

        let pool = StorageConfig::from_builder(builder).unwrap().database_config();

        assert_eq!(pool.url, "postgres://db.internal/registry");
        assert_eq!(pool.max_connections, 25);
        assert_eq!(pool.min_connections, 2);
        assert_eq!(pool.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_malformed_value_is_a_configuration_error() {
        let builder = config::Config::builder()
            .set_override("max_connections", "plenty")
            .unwrap();

        let error = StorageConfig::from_builder(builder).unwrap_err();
        assert!(matches!(error, CoreError::Configuration(_)));
    }
}
