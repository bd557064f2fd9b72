//! Engine configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                      | Default        |
//! |-------------------------------|----------------|
//! | `ORDERLY_DB_PATH`             | `./orderly.db` |
//! | `ORDERLY_DB_MAX_CONNECTIONS`  | `5`            |
//! | `ORDERLY_ORDER_NUMBER_PREFIX` | `ORD-`         |
//! | `ORDERLY_ORDER_NUMBER_WIDTH`  | `6` (1..=18)   |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use orderly_core::numbering::{
    OrderNumberFormat, DEFAULT_ORDER_NUMBER_PREFIX, DEFAULT_ORDER_NUMBER_WIDTH,
    MAX_ORDER_NUMBER_WIDTH,
};
use orderly_db::{DbConfig, DEFAULT_DATABASE_PATH};

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// Order number prefix
    pub order_number_prefix: String,

    /// Zero-padding width of the order number
    pub order_number_width: usize,
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = EngineConfig {
            db_path: lookup("ORDERLY_DB_PATH")
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string())
                .into(),

            db_max_connections: lookup("ORDERLY_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ORDERLY_DB_MAX_CONNECTIONS".to_string()))?,

            order_number_prefix: lookup("ORDERLY_ORDER_NUMBER_PREFIX")
                .unwrap_or_else(|| DEFAULT_ORDER_NUMBER_PREFIX.to_string()),

            order_number_width: lookup("ORDERLY_ORDER_NUMBER_WIDTH")
                .unwrap_or_else(|| DEFAULT_ORDER_NUMBER_WIDTH.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ORDERLY_ORDER_NUMBER_WIDTH".to_string()))?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "ORDERLY_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        if !(1..=MAX_ORDER_NUMBER_WIDTH).contains(&config.order_number_width) {
            return Err(ConfigError::InvalidValue(
                "ORDERLY_ORDER_NUMBER_WIDTH".to_string(),
            ));
        }

        Ok(config)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.db_path).max_connections(self.db_max_connections)
    }

    /// Order number rendering derived from this configuration.
    pub fn order_number_format(&self) -> OrderNumberFormat {
        OrderNumberFormat::new(self.order_number_prefix.clone(), self.order_number_width)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
