use std::path::Path;

use shelf_context::{ConnectionContext, DatabaseContext};
use shelf_store::{Database, InMemoryDatabase, StoreConfig, StoreStats};
use tracing::info;

use crate::error::SdkResult;

/// An opened shelf: one database plus the contexts that run operations on it.
///
/// `Shelf` is the main entry point for applications. It owns the database
/// handle; every context it hands out shares the same records.
#[derive(Clone, Debug)]
pub struct Shelf<D = InMemoryDatabase> {
    database: D,
}

impl Shelf<InMemoryDatabase> {
    /// Open an in-memory shelf with the default configuration.
    pub fn open() -> Self {
        Self::open_with(StoreConfig::default())
    }

    pub fn open_with(config: StoreConfig) -> Self {
        info!(
            name = %config.name,
            read_only = config.read_only,
            max_connections = ?config.max_connections,
            "opened shelf"
        );
        Self {
            database: InMemoryDatabase::with_config(config),
        }
    }

    /// Open a shelf configured by a TOML document.
    pub fn from_toml_str(source: &str) -> SdkResult<Self> {
        Ok(Self::open_with(StoreConfig::from_toml_str(source)?))
    }

    /// Open a shelf configured by the TOML file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> SdkResult<Self> {
        Ok(Self::open_with(StoreConfig::from_file(path)?))
    }

    pub fn config(&self) -> &StoreConfig {
        self.database.config()
    }

    pub fn stats(&self) -> StoreStats {
        self.database.stats()
    }
}

impl<D: Database> Shelf<D> {
    /// Wrap an existing database.
    pub fn with_database(database: D) -> Self {
        Self { database }
    }

    pub fn store(&self) -> &D {
        &self.database
    }

    /// A context that opens a fresh connection for every operation.
    pub fn database(&self) -> DatabaseContext<D> {
        DatabaseContext::new(self.database.clone())
    }

    /// A context that reuses one connection for every operation.
    pub fn connection(&self) -> SdkResult<ConnectionContext<D::Connection>> {
        Ok(ConnectionContext::new(self.database.new_connection()?))
    }
}
