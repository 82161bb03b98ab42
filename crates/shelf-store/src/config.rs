use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Configuration for a store database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Name used in log output.
    pub name: String,
    /// When `true`, every write transaction fails with [`StoreError::ReadOnly`].
    pub read_only: bool,
    /// Upper bound on simultaneously open connections. `None` is unlimited.
    pub max_connections: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "shelf".to_string(),
            read_only: false,
            max_connections: None,
        }
    }
}

impl StoreConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_max_connections(mut self, limit: usize) -> Self {
        self.max_connections = Some(limit);
        self
    }

    /// Parse a configuration from TOML. Missing fields take their defaults.
    pub fn from_toml_str(source: &str) -> StoreResult<Self> {
        toml::from_str(source).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Load a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
