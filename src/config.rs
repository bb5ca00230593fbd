//! Application configuration loaded from the environment.
//!
//! Values come from process environment variables, optionally seeded from a
//! `.env` file by the binary (`dotenvy`). Paths default to the platform data
//! directory (`dirs`).

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::utils::data_dir;

pub const DB_PATH_VAR: &str = "MIANJING_DB_PATH";
pub const DIMENSIONS_PATH_VAR: &str = "MIANJING_DIMENSIONS_PATH";
pub const CACHE_TTL_VAR: &str = "MIANJING_FILTER_CACHE_TTL_SECS";
pub const QUERY_TIMEOUT_VAR: &str = "MIANJING_QUERY_TIMEOUT_MS";

const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The dimension configuration file could not be read
    #[error("Failed to read dimension config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dimension configuration is not valid JSON or has the wrong shape
    #[error("Failed to parse dimension config: {0}")]
    Parse(#[from] serde_json::Error),

    /// One dimension entry has the wrong shape
    #[error("Invalid config for dimension '{key}': {source}")]
    InvalidDimension {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// An environment variable holds a value that cannot be parsed
    #[error("Invalid value for {key}: '{value}'")]
    InvalidEnv { key: &'static str, value: String },

    /// No platform data directory and no explicit path
    #[error("Failed to determine data directory")]
    NoDataDir,
}

/// Runtime settings for the CLI and services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    /// `None` selects the builtin dimension configuration.
    pub dimensions_path: Option<PathBuf>,
    pub cache_ttl: Duration,
    pub query_timeout: Duration,
}

impl AppConfig {
    /// Reads configuration from environment variables, applying defaults.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `MIANJING_DB_PATH` | `{data_dir}/mianjing/posts.db` |
    /// | `MIANJING_DIMENSIONS_PATH` | builtin configuration |
    /// | `MIANJING_FILTER_CACHE_TTL_SECS` | 300 |
    /// | `MIANJING_QUERY_TIMEOUT_MS` | 5000 |
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is malformed or no database path
    /// can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_path = match env_var(DB_PATH_VAR) {
            Some(path) => PathBuf::from(path),
            None => data_dir()
                .ok_or(ConfigError::NoDataDir)?
                .join("posts.db"),
        };

        Ok(Self {
            database_path,
            dimensions_path: env_var(DIMENSIONS_PATH_VAR).map(PathBuf::from),
            cache_ttl: env_u64(CACHE_TTL_VAR)?
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CACHE_TTL),
            query_timeout: env_u64(QUERY_TIMEOUT_VAR)?
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_QUERY_TIMEOUT),
        })
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_u64(key: &'static str) -> Result<Option<u64>, ConfigError> {
    env_var(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { key, value })
        })
        .transpose()
}
