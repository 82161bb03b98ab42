use std::fmt;

use shelf_context::{AsyncContext, DeferredContext, DeferredTask, Delivery, ReadContext, WriteContext};
use shelf_store::{ReadTransaction, WriteTransaction};
use tokio::runtime::Handle;

use crate::error::{PersistError, PersistResult};

type ReadBlock<O> = Box<dyn FnOnce(&dyn ReadTransaction) -> PersistResult<O> + Send>;
type WriteBlock<O> = Box<dyn FnOnce(&mut dyn WriteTransaction) -> PersistResult<O> + Send>;

/// A typed read, ready to run against any context.
///
/// Building a `ReadOp` touches nothing; the store is read only when the op is
/// run, inside exactly one read transaction.
#[must_use = "a ReadOp does nothing until it is run"]
pub struct ReadOp<O> {
    label: String,
    block: ReadBlock<O>,
}

impl<O: Send + 'static> ReadOp<O> {
    pub fn new<F>(label: impl Into<String>, block: F) -> Self
    where
        F: FnOnce(&dyn ReadTransaction) -> PersistResult<O> + Send + 'static,
    {
        Self {
            label: label.into(),
            block: Box::new(block),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run against a transaction the caller already holds.
    pub fn apply(self, tx: &dyn ReadTransaction) -> PersistResult<O> {
        (self.block)(tx)
    }

    /// Run synchronously in one read transaction of `ctx`.
    pub fn run<C: ReadContext>(self, ctx: &C) -> PersistResult<O> {
        let block = self.block;
        ctx.read(move |tx| block(tx))
    }

    /// Run without blocking; `completion` is delivered on `deliver_on`.
    pub fn run_async<C, F>(self, ctx: &C, deliver_on: &Handle, completion: F)
    where
        C: AsyncContext,
        F: FnOnce(PersistResult<O>) + Send + 'static,
    {
        let block = self.block;
        ctx.async_read(move |tx| block(tx), deliver_on, completion);
    }

    /// Run without blocking and await the result.
    pub fn run_future<C: AsyncContext>(self, ctx: &C, deliver_on: &Handle) -> Delivery<O, PersistError> {
        let block = self.block;
        ctx.read_future(move |tx| block(tx), deliver_on)
    }

    /// Transform the result once the read has run.
    pub fn map<P, F>(self, f: F) -> ReadOp<P>
    where
        P: Send + 'static,
        F: FnOnce(O) -> P + Send + 'static,
    {
        let block = self.block;
        ReadOp::new(self.label, move |tx| block(tx).map(f))
    }
}

impl<O> fmt::Debug for ReadOp<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOp").field("label", &self.label).finish()
    }
}

/// A typed write or removal, ready to run against any writable context.
///
/// Encoding happens inside the transaction, so an encode failure rolls back
/// everything the op (or a composition of ops) has staged.
#[must_use = "a WriteOp does nothing until it is run"]
pub struct WriteOp<O> {
    label: String,
    block: WriteBlock<O>,
}

impl<O: Send + 'static> WriteOp<O> {
    pub fn new<F>(label: impl Into<String>, block: F) -> Self
    where
        F: FnOnce(&mut dyn WriteTransaction) -> PersistResult<O> + Send + 'static,
    {
        Self {
            label: label.into(),
            block: Box::new(block),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run against a transaction the caller already holds.
    pub fn apply(self, tx: &mut dyn WriteTransaction) -> PersistResult<O> {
        (self.block)(tx)
    }

    /// Run synchronously in one read-write transaction of `ctx`.
    pub fn run<C: WriteContext>(self, ctx: &C) -> PersistResult<O> {
        let block = self.block;
        ctx.read_write(move |tx| block(tx))
    }

    /// Run without blocking; `completion` is delivered on `deliver_on` after
    /// the transaction commits.
    pub fn run_async<C, F>(self, ctx: &C, deliver_on: &Handle, completion: F)
    where
        C: AsyncContext,
        F: FnOnce(PersistResult<O>) + Send + 'static,
    {
        let block = self.block;
        ctx.async_read_write(move |tx| block(tx), deliver_on, completion);
    }

    /// Run without blocking and await the committed result.
    pub fn run_future<C: AsyncContext>(self, ctx: &C, deliver_on: &Handle) -> Delivery<O, PersistError> {
        let block = self.block;
        ctx.read_write_future(move |tx| block(tx), deliver_on)
    }

    /// Package as a cancellable task. The output is discarded; the task
    /// reports only success or failure.
    pub fn into_task<C: DeferredContext>(self, ctx: &C) -> DeferredTask<PersistError> {
        let block = self.block;
        ctx.task(self.label, move |tx| block(tx).map(|_| ()))
    }

    /// Compose with `next` so both run, in order, in one transaction.
    pub fn and<P: Send + 'static>(self, next: WriteOp<P>) -> WriteOp<(O, P)> {
        let label = format!("{} + {}", self.label, next.label);
        let (first, second) = (self.block, next.block);
        WriteOp::new(label, move |tx| {
            let a = first(&mut *tx)?;
            let b = second(tx)?;
            Ok((a, b))
        })
    }

    /// Transform the result once the write has run.
    pub fn map<P, F>(self, f: F) -> WriteOp<P>
    where
        P: Send + 'static,
        F: FnOnce(O) -> P + Send + 'static,
    {
        let block = self.block;
        WriteOp::new(self.label, move |tx| block(tx).map(f))
    }
}

impl<O> fmt::Debug for WriteOp<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteOp").field("label", &self.label).finish()
    }
}
