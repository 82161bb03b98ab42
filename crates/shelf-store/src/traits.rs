use shelf_types::Index;
use tokio::runtime::Handle;

use crate::error::{StoreError, StoreResult};

/// A live read transaction.
///
/// The view is consistent for the life of the transaction. Implementations
/// must return `Ok(None)` for a missing record; `Err` is reserved for
/// failures of the store itself.
pub trait ReadTransaction {
    /// The payload stored under `collection`/`key`.
    fn read_payload(&self, collection: &str, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// The metadata blob stored under `collection`/`key`, if the record exists
    /// and has one.
    fn read_metadata(&self, collection: &str, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Every key in `collection`. Order is unspecified.
    fn keys(&self, collection: &str) -> StoreResult<Vec<String>>;

    /// Check whether a record exists.
    ///
    /// Default implementation reads the payload. Backends may override with
    /// a cheaper lookup.
    fn contains(&self, collection: &str, key: &str) -> StoreResult<bool> {
        Ok(self.read_payload(collection, key)?.is_some())
    }
}

/// A live read-write transaction.
///
/// Reads inside a write transaction observe its own uncommitted writes.
/// Nothing becomes visible to other transactions until the enclosing
/// [`Connection::read_write`] block returns `Ok`.
pub trait WriteTransaction: ReadTransaction {
    /// Store `payload` and `metadata` under `collection`/`key`, replacing any
    /// existing record. `None` metadata clears a previous blob.
    fn write_payload(
        &mut self,
        collection: &str,
        key: &str,
        payload: Vec<u8>,
        metadata: Option<Vec<u8>>,
    ) -> StoreResult<()>;

    /// Delete the record at `collection`/`key`. Missing records are a no-op.
    fn remove_payload(&mut self, collection: &str, key: &str) -> StoreResult<()>;

    /// Delete several records.
    ///
    /// Default implementation calls `remove_payload()` for each index.
    fn remove_payloads(&mut self, indexes: &[Index]) -> StoreResult<()> {
        for index in indexes {
            self.remove_payload(index.collection(), index.key())?;
        }
        Ok(())
    }

    /// View this transaction as a read transaction.
    fn as_read(&self) -> &dyn ReadTransaction;
}

/// A connection to a database.
///
/// Every call runs exactly one transaction. Connections are cheap handles
/// and may be cloned and shared between threads; clones refer to the same
/// connection.
///
/// Blocks must not open another read-write transaction on the same database
/// while they run: write transactions are serialized and would wait on
/// themselves.
pub trait Connection: Clone + Send + Sync + 'static {
    /// Run `block` inside one read transaction.
    fn read<T, E, F>(&self, block: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<T, E>,
        E: From<StoreError>;

    /// Run `block` inside one read-write transaction.
    ///
    /// The transaction commits if `block` returns `Ok` and rolls back if it
    /// returns `Err`.
    fn read_write<T, E, F>(&self, block: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, E>,
        E: From<StoreError>;

    /// Run `block` in a read transaction on the runtime's blocking pool, then
    /// deliver the result to `completion` as a task on `deliver_on`.
    fn async_read<T, E, F, C>(&self, block: F, deliver_on: &Handle, completion: C)
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<T, E> + Send + 'static,
        C: FnOnce(Result<T, E>) + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        let connection = self.clone();
        let delivery = deliver_on.clone();
        deliver_on.spawn_blocking(move || {
            let result = connection.read(block);
            delivery.spawn(async move { completion(result) });
        });
    }

    /// Run `block` in a read-write transaction on the runtime's blocking
    /// pool, then deliver the result to `completion` as a task on
    /// `deliver_on`. The completion runs only after the transaction has
    /// committed (or rolled back).
    fn async_read_write<T, E, F, C>(&self, block: F, deliver_on: &Handle, completion: C)
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, E> + Send + 'static,
        C: FnOnce(Result<T, E>) + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        let connection = self.clone();
        let delivery = deliver_on.clone();
        deliver_on.spawn_blocking(move || {
            let result = connection.read_write(block);
            delivery.spawn(async move { completion(result) });
        });
    }
}

/// A database handle that opens connections.
pub trait Database: Clone + Send + Sync + 'static {
    type Connection: Connection;

    /// Open a brand-new connection.
    fn new_connection(&self) -> StoreResult<Self::Connection>;
}
