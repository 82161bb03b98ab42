use shelf_store::{Connection, ReadTransaction, StoreError, WriteTransaction};
use tokio::runtime::Handle;

use crate::task::DeferredTask;
use crate::traits::{AsyncContext, DeferredContext, ReadContext, WriteContext};

/// Connection tier: every call opens exactly one new transaction on the
/// wrapped connection.
#[derive(Clone, Debug)]
pub struct ConnectionContext<C> {
    connection: C,
}

impl<C: Connection> ConnectionContext<C> {
    pub fn new(connection: C) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn into_connection(self) -> C {
        self.connection
    }
}

impl<C: Connection> ReadContext for ConnectionContext<C> {
    fn read<T, E, F>(&self, block: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.connection.read(block)
    }
}

impl<C: Connection> WriteContext for ConnectionContext<C> {
    fn read_write<T, E, F>(&self, block: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.connection.read_write(block)
    }
}

impl<C: Connection> AsyncContext for ConnectionContext<C> {
    fn async_read<T, E, F, Cb>(&self, block: F, deliver_on: &Handle, completion: Cb)
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<T, E> + Send + 'static,
        Cb: FnOnce(Result<T, E>) + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        self.connection.async_read(block, deliver_on, completion);
    }

    fn async_read_write<T, E, F, Cb>(&self, block: F, deliver_on: &Handle, completion: Cb)
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, E> + Send + 'static,
        Cb: FnOnce(Result<T, E>) + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        self.connection.async_read_write(block, deliver_on, completion);
    }
}

impl<C: Connection> DeferredContext for ConnectionContext<C> {
    fn task<E, F>(&self, label: impl Into<String>, block: F) -> DeferredTask<E>
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<(), E> + Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        let connection = self.connection.clone();
        DeferredTask::new(label, move || connection.read_write(block))
    }
}
