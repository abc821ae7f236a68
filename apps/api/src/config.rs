//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                     | Default                               |
//! |------------------------------|---------------------------------------|
//! | `SHOEBOX_PORT`               | 8080                                  |
//! | `SHOEBOX_DB_PATH`            | `<platform data dir>/shoebox.db`      |
//! | `SHOEBOX_DB_MAX_CONNECTIONS` | 5                                     |
//! | `SHOEBOX_LOW_STOCK_THRESHOLD`| 3                                     |

use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;
use shoebox_core::DEFAULT_LOW_STOCK_THRESHOLD;

/// API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// SQLite database file
    pub db_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// Default for `GET /stock/low` when no threshold is given
    pub low_stock_threshold: i64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = match lookup("SHOEBOX_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        let config = ApiConfig {
            port: parse_or(&lookup, "SHOEBOX_PORT", 8080)?,
            db_path,
            db_max_connections: parse_or(&lookup, "SHOEBOX_DB_MAX_CONNECTIONS", 5)?,
            low_stock_threshold: parse_or(
                &lookup,
                "SHOEBOX_LOW_STOCK_THRESHOLD",
                DEFAULT_LOW_STOCK_THRESHOLD,
            )?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("SHOEBOX_DB_MAX_CONNECTIONS".to_string()));
        }
        if config.low_stock_threshold < 0 {
            return Err(ConfigError::InvalidValue("SHOEBOX_LOW_STOCK_THRESHOLD".to_string()));
        }

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Platform data directory, e.g. `~/.local/share/shoebox/shoebox.db` on Linux.
fn default_db_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "shoebox", "shoebox")
        .ok_or_else(|| ConfigError::MissingRequired("SHOEBOX_DB_PATH".to_string()))?;

    Ok(dirs.data_dir().join("shoebox.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
