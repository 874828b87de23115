//! Service configuration loaded from TOML and environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::progress_store::DEFAULT_STORAGE_KEY;

/// Environment variable overriding `storage_key`.
pub const ENV_STORAGE_KEY: &str = "CERT_PROGRESS_KEY";
/// Environment variable overriding `database_path`.
pub const ENV_DATABASE_PATH: &str = "CERT_DB_PATH";
/// Environment variable overriding `content_dir`.
pub const ENV_CONTENT_DIR: &str = "CERT_CONTENT_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Key the progress blob is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// SQLite file for durable progress. In-memory storage when unset.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// Directory of `*.toml` track files.
    #[serde(default)]
    pub content_dir: Option<PathBuf>,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            database_path: None,
            content_dir: None,
        }
    }
}

impl ServiceConfig {
    /// Reads a TOML config file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed, or the
    /// resulting config is invalid.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Defaults with process environment overrides applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyStorageKey` if the override is blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Applies `CERT_*` overrides read through `lookup`. Empty values are ignored
    /// for paths and rejected for the storage key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyStorageKey` if the resulting key is blank.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(key) = lookup(ENV_STORAGE_KEY) {
            self.storage_key = key;
        }
        if let Some(path) = lookup(ENV_DATABASE_PATH).filter(|p| !p.is_empty()) {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup(ENV_CONTENT_DIR).filter(|p| !p.is_empty()) {
            self.content_dir = Some(PathBuf::from(path));
        }
        self.validate()?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::EmptyStorageKey` if `storage_key` is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        Ok(())
    }
}
