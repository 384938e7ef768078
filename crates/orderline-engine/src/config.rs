//! Engine configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use orderline_db::DbConfig;

/// Engine configuration.
#[derive(Debug, Clone, Serialize)]
pub struct EngineConfig {
    /// SQLite database file (`ORDERLINE_DATABASE_PATH`)
    pub database_path: PathBuf,

    /// Pool size (`ORDERLINE_MAX_CONNECTIONS`)
    pub max_connections: u32,

    /// Writer lock wait in milliseconds (`ORDERLINE_BUSY_TIMEOUT_MS`)
    pub busy_timeout_ms: u64,

    /// Default tracing filter when `RUST_LOG` is unset (`ORDERLINE_LOG`)
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            database_path: PathBuf::from("./orderline.db"),
            max_connections: 5,
            busy_timeout_ms: 5000,
            log_filter: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (environment, test map, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EngineConfig::default();

        let config = EngineConfig {
            database_path: lookup("ORDERLINE_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            max_connections: lookup("ORDERLINE_MAX_CONNECTIONS")
                .map(|v| v.trim().parse::<u32>())
                .transpose()
                .map_err(|_| ConfigError::InvalidValue("ORDERLINE_MAX_CONNECTIONS".to_string()))?
                .unwrap_or(defaults.max_connections),

            busy_timeout_ms: lookup("ORDERLINE_BUSY_TIMEOUT_MS")
                .map(|v| v.trim().parse::<u64>())
                .transpose()
                .map_err(|_| ConfigError::InvalidValue("ORDERLINE_BUSY_TIMEOUT_MS".to_string()))?
                .unwrap_or(defaults.busy_timeout_ms),

            log_filter: lookup("ORDERLINE_LOG").unwrap_or(defaults.log_filter),
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "ORDERLINE_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Pool settings for [`orderline_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .busy_timeout(Duration::from_millis(self.busy_timeout_ms))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_path, PathBuf::from("./orderline.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.busy_timeout_ms, 5000);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("ORDERLINE_DATABASE_PATH", "/var/lib/orderline/data.db"),
            ("ORDERLINE_MAX_CONNECTIONS", "8"),
            ("ORDERLINE_BUSY_TIMEOUT_MS", " 250 "),
            ("ORDERLINE_LOG", "orderline_engine=debug"),
        ]))
        .unwrap();

        assert_eq!(config.max_connections, 8);
        assert_eq!(config.log_filter, "orderline_engine=debug");

        let db = config.db_config();
        assert_eq!(db.database_path, PathBuf::from("/var/lib/orderline/data.db"));
        assert_eq!(db.max_connections, 8);
        assert_eq!(db.busy_timeout, Duration::from_millis(250));
        assert!(db.run_migrations);
    }

    #[test]
    fn test_invalid_numbers() {
        let err = EngineConfig::from_lookup(lookup(&[("ORDERLINE_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref v) if v == "ORDERLINE_MAX_CONNECTIONS"));

        assert!(EngineConfig::from_lookup(lookup(&[("ORDERLINE_MAX_CONNECTIONS", "0")])).is_err());
        assert!(EngineConfig::from_lookup(lookup(&[("ORDERLINE_BUSY_TIMEOUT_MS", "-1")])).is_err());
    }
}
