use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::{Connection, Database, ReadTransaction, WriteTransaction};

#[derive(Clone, Debug, PartialEq, Eq)]
struct StoredRecord {
    payload: Vec<u8>,
    metadata: Option<Vec<u8>>,
}

type Collections = HashMap<String, HashMap<String, StoredRecord>>;

/// Staged changes of one write transaction. `None` marks a removal.
type Staged = HashMap<(String, String), Option<StoredRecord>>;

/// Counters describing the work a database has done.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Connections opened over the database's lifetime.
    pub connections_opened: u64,
    /// Connections currently open.
    pub open_connections: usize,
    /// Read transactions run.
    pub read_transactions: u64,
    /// Write transactions committed.
    pub write_transactions: u64,
    /// Write transactions rolled back.
    pub rolled_back: u64,
}

struct Shared {
    config: StoreConfig,
    data: RwLock<Collections>,
    writer: Mutex<()>,
    connections_opened: AtomicU64,
    open_connections: AtomicUsize,
    read_transactions: AtomicU64,
    write_transactions: AtomicU64,
    rolled_back: AtomicU64,
}

/// In-memory, HashMap-based database.
///
/// Intended for tests and embedding. Records live behind a `RwLock`; write
/// transactions are serialized by a separate writer lock and stage their
/// changes until commit, so concurrent readers never see a partial write.
/// Cloning the handle shares the same records.
#[derive(Clone)]
pub struct InMemoryDatabase {
    shared: Arc<Shared>,
}

impl InMemoryDatabase {
    /// Create an empty database with the default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty database with `config`.
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                data: RwLock::new(HashMap::new()),
                writer: Mutex::new(()),
                connections_opened: AtomicU64::new(0),
                open_connections: AtomicUsize::new(0),
                read_transactions: AtomicU64::new(0),
                write_transactions: AtomicU64::new(0),
                rolled_back: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.shared.config
    }

    /// Snapshot of the database counters.
    pub fn stats(&self) -> StoreStats {
        let s = &self.shared;
        StoreStats {
            connections_opened: s.connections_opened.load(Ordering::SeqCst),
            open_connections: s.open_connections.load(Ordering::SeqCst),
            read_transactions: s.read_transactions.load(Ordering::SeqCst),
            write_transactions: s.write_transactions.load(Ordering::SeqCst),
            rolled_back: s.rolled_back.load(Ordering::SeqCst),
        }
    }

    /// Number of records across all collections.
    pub fn len(&self) -> StoreResult<usize> {
        let data = self.shared.data.read()?;
        Ok(data.values().map(HashMap::len).sum())
    }

    /// Returns `true` if the database holds no records.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of records in `collection`.
    pub fn collection_len(&self, collection: &str) -> StoreResult<usize> {
        let data = self.shared.data.read()?;
        Ok(data.get(collection).map_or(0, HashMap::len))
    }

    fn reserve_connection(&self) -> StoreResult<()> {
        let open = &self.shared.open_connections;
        let Some(limit) = self.shared.config.max_connections else {
            open.fetch_add(1, Ordering::SeqCst);
            return Ok(());
        };
        let mut current = open.load(Ordering::SeqCst);
        loop {
            if current >= limit {
                return Err(StoreError::ConnectionLimit { limit });
            }
            match open.compare_exchange(current, current + 1, Ordering::SeqCst, Ordering::SeqCst) {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl Database for InMemoryDatabase {
    type Connection = InMemoryConnection;

    fn new_connection(&self) -> StoreResult<InMemoryConnection> {
        self.reserve_connection()?;
        let id = self.shared.connections_opened.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(store = %self.shared.config.name, connection = id, "opened connection");
        Ok(InMemoryConnection {
            inner: Arc::new(ConnectionInner {
                id,
                shared: Arc::clone(&self.shared),
            }),
        })
    }
}

impl std::fmt::Debug for InMemoryDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDatabase")
            .field("name", &self.shared.config.name)
            .field("stats", &self.stats())
            .finish()
    }
}

struct ConnectionInner {
    id: u64,
    shared: Arc<Shared>,
}

impl Drop for ConnectionInner {
    fn drop(&mut self) {
        self.shared.open_connections.fetch_sub(1, Ordering::SeqCst);
        debug!(store = %self.shared.config.name, connection = self.id, "closed connection");
    }
}

/// Connection to an [`InMemoryDatabase`].
///
/// Clones share one underlying connection, which closes when the last clone
/// is dropped.
#[derive(Clone)]
pub struct InMemoryConnection {
    inner: Arc<ConnectionInner>,
}

impl InMemoryConnection {
    /// Sequence number of this connection within its database, starting at 1.
    pub fn id(&self) -> u64 {
        self.inner.id
    }
}

impl std::fmt::Debug for InMemoryConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryConnection")
            .field("id", &self.inner.id)
            .finish()
    }
}

impl Connection for InMemoryConnection {
    fn read<T, E, F>(&self, block: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<T, E>,
        E: From<StoreError>,
    {
        let shared = &self.inner.shared;
        let data = shared.data.read().map_err(StoreError::from)?;
        shared.read_transactions.fetch_add(1, Ordering::SeqCst);
        block(&MemoryReadTransaction { data: &data })
    }

    fn read_write<T, E, F>(&self, block: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, E>,
        E: From<StoreError>,
    {
        let shared = &self.inner.shared;
        if shared.config.read_only {
            return Err(StoreError::ReadOnly.into());
        }
        // The writer lock guards no data and a panicking block applies nothing,
        // so a poisoned lock is still safe to take.
        let _writer = shared.writer.lock().unwrap_or_else(PoisonError::into_inner);

        // Writers are serialized, so the committed view cannot change between
        // running the block and applying its changes.
        let outcome = {
            let data = shared.data.read().map_err(StoreError::from)?;
            let mut tx = MemoryWriteTransaction {
                committed: &data,
                staged: HashMap::new(),
            };
            let result = block(&mut tx);
            result.map(move |value| (value, tx.staged))
        };

        match outcome {
            Ok((value, staged)) => {
                let changes = staged.len();
                let mut data = shared.data.write().map_err(StoreError::from)?;
                apply(&mut data, staged);
                shared.write_transactions.fetch_add(1, Ordering::SeqCst);
                debug!(connection = self.inner.id, changes, "committed write transaction");
                Ok(value)
            }
            Err(err) => {
                shared.rolled_back.fetch_add(1, Ordering::SeqCst);
                debug!(connection = self.inner.id, "rolled back write transaction");
                Err(err)
            }
        }
    }
}

fn apply(data: &mut Collections, staged: Staged) {
    for ((collection, key), change) in staged {
        match change {
            Some(record) => {
                data.entry(collection).or_default().insert(key, record);
            }
            None => {
                if let Some(records) = data.get_mut(&collection) {
                    records.remove(&key);
                    if records.is_empty() {
                        data.remove(&collection);
                    }
                }
            }
        }
    }
}

fn lookup<'a>(data: &'a Collections, collection: &str, key: &str) -> Option<&'a StoredRecord> {
    data.get(collection).and_then(|records| records.get(key))
}

struct MemoryReadTransaction<'a> {
    data: &'a Collections,
}

impl ReadTransaction for MemoryReadTransaction<'_> {
    fn read_payload(&self, collection: &str, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(lookup(self.data, collection, key).map(|r| r.payload.clone()))
    }

    fn read_metadata(&self, collection: &str, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(lookup(self.data, collection, key).and_then(|r| r.metadata.clone()))
    }

    fn keys(&self, collection: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .data
            .get(collection)
            .map(|records| records.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn contains(&self, collection: &str, key: &str) -> StoreResult<bool> {
        Ok(lookup(self.data, collection, key).is_some())
    }
}

struct MemoryWriteTransaction<'a> {
    committed: &'a Collections,
    staged: Staged,
}

impl MemoryWriteTransaction<'_> {
    fn current(&self, collection: &str, key: &str) -> Option<&StoredRecord> {
        match self.staged.get(&(collection.to_string(), key.to_string())) {
            Some(change) => change.as_ref(),
            None => lookup(self.committed, collection, key),
        }
    }
}

impl ReadTransaction for MemoryWriteTransaction<'_> {
    fn read_payload(&self, collection: &str, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.current(collection, key).map(|r| r.payload.clone()))
    }

    fn read_metadata(&self, collection: &str, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.current(collection, key).and_then(|r| r.metadata.clone()))
    }

    fn keys(&self, collection: &str) -> StoreResult<Vec<String>> {
        let mut keys: BTreeSet<String> = self
            .committed
            .get(collection)
            .map(|records| records.keys().cloned().collect())
            .unwrap_or_default();
        for ((c, key), change) in &self.staged {
            if c != collection {
                continue;
            }
            if change.is_some() {
                keys.insert(key.clone());
            } else {
                keys.remove(key);
            }
        }
        Ok(keys.into_iter().collect())
    }

    fn contains(&self, collection: &str, key: &str) -> StoreResult<bool> {
        Ok(self.current(collection, key).is_some())
    }
}

impl WriteTransaction for MemoryWriteTransaction<'_> {
    fn write_payload(
        &mut self,
        collection: &str,
        key: &str,
        payload: Vec<u8>,
        metadata: Option<Vec<u8>>,
    ) -> StoreResult<()> {
        self.staged.insert(
            (collection.to_string(), key.to_string()),
            Some(StoredRecord { payload, metadata }),
        );
        Ok(())
    }

    fn remove_payload(&mut self, collection: &str, key: &str) -> StoreResult<()> {
        self.staged
            .insert((collection.to_string(), key.to_string()), None);
        Ok(())
    }

    fn as_read(&self) -> &dyn ReadTransaction {
        self
    }
}
