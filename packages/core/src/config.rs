//! Runtime configuration
//!
//! `TreeConfig` is resolved once by the composition root (the CLI or an
//! embedding service) and handed to [`DatabaseService::from_config`] and the
//! tree services. Sources, highest precedence last:
//!
//! 1. Defaults
//! 2. JSON file named by `TREEDATA_CONFIG`
//! 3. `TREEDATA_DB` and `TREEDATA_PATH_POLICY` environment overrides
//!
//! [`DatabaseService::from_config`]: crate::db::DatabaseService::from_config

use crate::models::PathPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a JSON config file
pub const CONFIG_FILE_ENV: &str = "TREEDATA_CONFIG";

/// Environment variable overriding the database path
pub const DATABASE_PATH_ENV: &str = "TREEDATA_DB";

/// Environment variable overriding the path policy (`strict` | `lenient`)
pub const PATH_POLICY_ENV: &str = "TREEDATA_PATH_POLICY";

/// Default SQLite busy timeout applied to every connection
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Cannot determine home directory for the default database path")]
    NoHomeDirectory,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the tree store and services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Path to the database file
    pub database_path: PathBuf,

    /// Segment validation policy for incoming paths
    pub path_policy: PathPolicy,

    /// Busy timeout in milliseconds for each connection
    pub busy_timeout_ms: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path().unwrap_or_else(|_| PathBuf::from("treedata.db")),
            path_policy: PathPolicy::default(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl TreeConfig {
    /// Config pointing at a specific database file, other fields default
    pub fn with_database_path(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            ..Self::default()
        }
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve from the process environment (see module docs for precedence)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Resolve using `lookup` in place of the process environment
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(CONFIG_FILE_ENV) {
            Some(file) => Self::from_file(Path::new(&file))?,
            None => Self::default(),
        };

        if let Some(db) = lookup(DATABASE_PATH_ENV) {
            config.database_path = PathBuf::from(db);
        }

        if let Some(policy) = lookup(PATH_POLICY_ENV) {
            config.path_policy = policy.parse().map_err(ConfigError::Invalid)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "database_path cannot be empty".to_string(),
            ));
        }

        if self.busy_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "busy_timeout_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// `~/.treedata/database/treedata.db`
pub fn default_database_path() -> Result<PathBuf, ConfigError> {
    let home_dir = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
    Ok(home_dir
        .join(".treedata")
        .join("database")
        .join("treedata.db"))
}
