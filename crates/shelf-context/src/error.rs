use shelf_store::StoreError;

/// Errors produced by the execution context layer.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The completion was dropped without a result, e.g. because the
    /// transaction panicked or the runtime shut down.
    #[error("completion dropped before a result was delivered")]
    CompletionDropped,

    /// The work queue no longer accepts tasks.
    #[error("work queue is closed")]
    QueueClosed,

    /// A queued task stopped without reporting an outcome.
    #[error("deferred task aborted")]
    TaskAborted,
}

/// Result alias for context operations.
pub type ContextResult<T> = Result<T, ContextError>;
