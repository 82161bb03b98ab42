use shelf_store::{Connection, Database, ReadTransaction, StoreError, StoreResult, WriteTransaction};
use tokio::runtime::Handle;
use tracing::debug;

use crate::connection::ConnectionContext;
use crate::task::DeferredTask;
use crate::traits::{AsyncContext, DeferredContext, ReadContext, WriteContext};

/// Database tier: every call opens a brand-new connection, runs exactly one
/// transaction on it, and drops it.
///
/// No connection is cached between calls. Use [`connection`](Self::connection)
/// to hold one connection across several calls.
#[derive(Clone, Debug)]
pub struct DatabaseContext<D> {
    database: D,
}

impl<D: Database> DatabaseContext<D> {
    pub fn new(database: D) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &D {
        &self.database
    }

    /// Escalate to the connection tier with a newly opened connection.
    pub fn connection(&self) -> StoreResult<ConnectionContext<D::Connection>> {
        Ok(ConnectionContext::new(self.open()?))
    }

    fn open(&self) -> StoreResult<D::Connection> {
        debug!("opening connection for database-tier call");
        self.database.new_connection()
    }
}

impl<D: Database> ReadContext for DatabaseContext<D> {
    fn read<T, E, F>(&self, block: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.open()?.read(block)
    }
}

impl<D: Database> WriteContext for DatabaseContext<D> {
    fn read_write<T, E, F>(&self, block: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.open()?.read_write(block)
    }
}

impl<D: Database> AsyncContext for DatabaseContext<D> {
    fn async_read<T, E, F, C>(&self, block: F, deliver_on: &Handle, completion: C)
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<T, E> + Send + 'static,
        C: FnOnce(Result<T, E>) + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        match self.open() {
            Ok(connection) => connection.async_read(block, deliver_on, completion),
            Err(err) => {
                deliver_on.spawn(async move { completion(Err(err.into())) });
            }
        }
    }

    fn async_read_write<T, E, F, C>(&self, block: F, deliver_on: &Handle, completion: C)
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, E> + Send + 'static,
        C: FnOnce(Result<T, E>) + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        match self.open() {
            Ok(connection) => connection.async_read_write(block, deliver_on, completion),
            Err(err) => {
                deliver_on.spawn(async move { completion(Err(err.into())) });
            }
        }
    }
}

/// The connection is opened when the task runs, not when it is built.
impl<D: Database> DeferredContext for DatabaseContext<D> {
    fn task<E, F>(&self, label: impl Into<String>, block: F) -> DeferredTask<E>
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<(), E> + Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        let database = self.database.clone();
        DeferredTask::new(label, move || database.new_connection()?.read_write(block))
    }
}
