use std::cell::RefCell;

use shelf_store::{ReadTransaction, StoreError, WriteTransaction};
use tokio::runtime::Handle;
use tracing::debug;

use crate::traits::{AsyncContext, ReadContext, WriteContext};

/// A live read transaction, valid for the duration of one call.
///
/// Operations run immediately against the transaction. There is no way to
/// reach a connection or database from here.
#[derive(Clone, Copy)]
pub struct BoundRead<'t> {
    tx: &'t dyn ReadTransaction,
}

impl<'t> BoundRead<'t> {
    pub fn new(tx: &'t dyn ReadTransaction) -> Self {
        Self { tx }
    }

    pub fn transaction(&self) -> &'t dyn ReadTransaction {
        self.tx
    }
}

impl ReadContext for BoundRead<'_> {
    fn read<T, E, F>(&self, block: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<T, E>,
        E: From<StoreError>,
    {
        block(self.tx)
    }
}

impl std::fmt::Debug for BoundRead<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BoundRead")
    }
}

/// A live read-write transaction, valid for the duration of one call.
///
/// Every operation issued through a `BoundWrite` joins the enclosing
/// transaction and commits or rolls back with it. Calls must not nest: a
/// block that uses the same `BoundWrite` while another of its calls is still
/// running gets [`StoreError::TransactionBusy`].
pub struct BoundWrite<'t> {
    tx: RefCell<&'t mut dyn WriteTransaction>,
    pending: RefCell<Vec<Settle>>,
}

/// A completion held back until the enclosing transaction ends. Called with
/// `true` once it has committed.
type Settle = Box<dyn FnOnce(bool) + Send>;

impl<'t> BoundWrite<'t> {
    pub(crate) fn new(tx: &'t mut dyn WriteTransaction) -> Self {
        Self {
            tx: RefCell::new(tx),
            pending: RefCell::new(Vec::new()),
        }
    }

    /// Release the held completions, to be settled by whoever owns the
    /// enclosing transaction.
    pub(crate) fn into_pending(self) -> PendingCompletions {
        PendingCompletions(self.pending.into_inner())
    }

    fn hold<T, E, C>(&self, result: Result<T, E>, deliver_on: &Handle, completion: C)
    where
        C: FnOnce(Result<T, E>) + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        let delivery = deliver_on.clone();
        self.pending.borrow_mut().push(Box::new(move |committed| {
            let result = if committed {
                result
            } else {
                Err(StoreError::RolledBack.into())
            };
            delivery.spawn(async move { completion(result) });
        }));
    }
}

/// Completions issued through a [`BoundWrite`], waiting on its transaction.
#[must_use = "held completions fire only when settled"]
pub(crate) struct PendingCompletions(Vec<Settle>);

impl PendingCompletions {
    /// Dispatch every held completion. After a rollback each one receives
    /// [`StoreError::RolledBack`] instead of its result.
    pub(crate) fn settle(self, committed: bool) {
        if self.0.is_empty() {
            return;
        }
        debug!(committed, completions = self.0.len(), "settling bound completions");
        for settle in self.0 {
            settle(committed);
        }
    }
}

impl ReadContext for BoundWrite<'_> {
    fn read<T, E, F>(&self, block: F) -> Result<T, E>
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<T, E>,
        E: From<StoreError>,
    {
        let tx = self.tx.try_borrow().map_err(|_| StoreError::TransactionBusy)?;
        block(tx.as_read())
    }
}

impl WriteContext for BoundWrite<'_> {
    fn read_write<T, E, F>(&self, block: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut tx = self
            .tx
            .try_borrow_mut()
            .map_err(|_| StoreError::TransactionBusy)?;
        block(&mut **tx)
    }

    /// Joins this transaction; completions held by the inner context wait
    /// for the outer one.
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
        if let Some(PendingCompletions(held)) = pending {
            self.pending.borrow_mut().extend(held);
        }
        result
    }
}

/// The block runs right away against the live transaction. Its completion is
/// held until the enclosing transaction ends, then dispatched on `deliver_on`.
impl AsyncContext for BoundWrite<'_> {
    fn async_read<T, E, F, C>(&self, block: F, deliver_on: &Handle, completion: C)
    where
        F: FnOnce(&dyn ReadTransaction) -> Result<T, E> + Send + 'static,
        C: FnOnce(Result<T, E>) + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        let result = self.read(block);
        self.hold(result, deliver_on, completion);
    }

    fn async_read_write<T, E, F, C>(&self, block: F, deliver_on: &Handle, completion: C)
    where
        F: FnOnce(&mut dyn WriteTransaction) -> Result<T, E> + Send + 'static,
        C: FnOnce(Result<T, E>) + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        let result = self.read_write(block);
        self.hold(result, deliver_on, completion);
    }
}

impl std::fmt::Debug for BoundWrite<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundWrite")
            .field("busy", &self.tx.try_borrow_mut().is_err())
            .field("pending", &self.pending.borrow().len())
            .finish()
    }
}
