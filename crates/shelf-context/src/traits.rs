use shelf_store::{ReadTransaction, StoreError, WriteTransaction};
use tokio::runtime::Handle;

use crate::bound::{BoundRead, BoundWrite};
use crate::delivery::Delivery;
use crate::error::ContextError;
use crate::task::DeferredTask;

/// A context that can run a block inside a read transaction.
///
/// Implemented by every tier. Blocks receive the live transaction and must
/// not retain it beyond the call.
pub trait ReadContext {
    /// Run `block` against a read transaction and return its result.
    fn read<T, E, F>(&self, block: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<T, E>,
        E: From<StoreError>;

    /// Run `block` with a bound read context over one transaction, so that
    /// several typed reads observe the same view.
    fn with_bound_read<T, E, F>(&self, block: F) -> Result<T, E>
    where
        F: FnOnce(&BoundRead<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.read(|tx| block(&BoundRead::new(tx)))
    }
}

/// A context that can also run a block inside a read-write transaction.
pub trait WriteContext: ReadContext {
    /// Run `block` against a read-write transaction. The transaction commits
    /// when `block` returns `Ok` and rolls back when it returns `Err`.
    fn read_write<T, E, F>(&self, block: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, E>,
        E: From<StoreError>;

    /// Run `block` with a bound write context over one transaction, so that
    /// several typed operations commit or roll back together.
    fn with_bound_write<T, E, F>(&self, block: F) -> Result<T, E>
    where
        F: FnOnce(&BoundWrite<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut pending = None;
        let result = self.read_write(|tx| {
            let bound = BoundWrite::new(tx);
            let output = block(&bound);
            pending = Some(bound.into_pending());
            output
        });
        if let Some(pending) = pending {
            pending.settle(result.is_ok());
        }
        result
    }
}

/// A context that can run transactions without blocking the caller.
///
/// Completions are always dispatched as tasks on `deliver_on`, never run on
/// the thread that executed the transaction.
pub trait AsyncContext: WriteContext {
    fn async_read<T, E, F, C>(&self, block: F, deliver_on: &Handle, completion: C)
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<T, E> + Send + 'static,
        C: FnOnce(Result<T, E>) + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static;

    fn async_read_write<T, E, F, C>(&self, block: F, deliver_on: &Handle, completion: C)
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, E> + Send + 'static,
        C: FnOnce(Result<T, E>) + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static;

    /// [`async_read`](AsyncContext::async_read) as a future.
    fn read_future<T, E, F>(&self, block: F, deliver_on: &Handle) -> Delivery<T, E>
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + From<ContextError> + Send + 'static,
    {
        let (completion, delivery) = Delivery::channel();
        self.async_read(block, deliver_on, completion);
        delivery
    }

    /// [`async_read_write`](AsyncContext::async_read_write) as a future.
    fn read_write_future<T, E, F>(&self, block: F, deliver_on: &Handle) -> Delivery<T, E>
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + From<ContextError> + Send + 'static,
    {
        let (completion, delivery) = Delivery::channel();
        self.async_read_write(block, deliver_on, completion);
        delivery
    }
}

/// A context that can package a read-write block as a deferred task.
///
/// Running the task performs exactly one transaction. Bound transactions do
/// not implement this trait: a task outlives the call that created it.
pub trait DeferredContext {
    fn task<E, F>(&self, label: impl Into<String>, block: F) -> DeferredTask<E>
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<(), E> + Send + 'static,
        E: From<StoreError> + Send + 'static;
}
