//! # Companion configuration: `companion.toml`
//!
//! Defines the TOML configuration file that lives in the companion's data
//! directory (filename: [`CompanionConfig::filename`] = `"companion.toml"`).
//! It decides where each store is persisted and how long the derived
//! "recent" lists are.
//!
//! ## Structure
//!
//! ```toml
//! [storage]
//! key_prefix = "study"         # storage keys become "study-notes", "study-docs", ...
//!
//! [queries]
//! recent_limit = 10            # recent notes / documents
//! recent_activity_limit = 6    # merged docs + notes feed
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`CompanionConfig`] | Top-level config. Builder helpers (`new`, `with_recent_limit`), TOML (de)serialisation, file loading and the canonical filename. |
//! | [`StorageConfig`] | Storage section: the key prefix, default **`study`**. |
//! | [`QueryConfig`] | Query section: list lengths, defaults **10** and **6**. |
//!
//! All structs implement `Default` so that a missing or empty config file is
//! equivalent to the default configuration.

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Top-level configuration stored in `companion.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanionConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub queries: QueryConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Prefix of every storage key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_key_prefix() -> String {
    "study".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
        }
    }
}

impl StorageConfig {
    /// Storage key for the store called `name`: `"<prefix>-<name>"`.
    pub fn key(&self, name: &str) -> String {
        format!("{}-{}", self.key_prefix, name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Length of the recent notes and recent documents lists.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    /// Length of the merged recent activity feed.
    #[serde(default = "default_recent_activity_limit")]
    pub recent_activity_limit: usize,
}

fn default_recent_limit() -> usize {
    10
}

fn default_recent_activity_limit() -> usize {
    6
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
            recent_activity_limit: default_recent_activity_limit(),
        }
    }
}

impl CompanionConfig {
    /// Create a config with the given storage key prefix.
    pub fn new(key_prefix: impl Into<String>) -> Self {
        Self {
            storage: StorageConfig {
                key_prefix: key_prefix.into(),
            },
            queries: QueryConfig::default(),
        }
    }

    /// Builder method to set the recent list length.
    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.queries.recent_limit = limit;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "companion.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Read `companion.toml` from `dir`, falling back to the default
    /// configuration when the file does not exist.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(Self::filename());
        match std::fs::read_to_string(&path) {
            Ok(raw) => Self::from_toml(&raw),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}
