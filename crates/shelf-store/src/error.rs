/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write transaction was requested on a read-only store.
    #[error("store is read-only")]
    ReadOnly,

    /// Opening another connection would exceed the configured limit.
    #[error("connection limit reached ({limit})")]
    ConnectionLimit { limit: usize },

    /// A lock guarding store state was poisoned by a panicking holder.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// The transaction is already in use by an enclosing call.
    #[error("transaction is busy")]
    TransactionBusy,

    /// The enclosing transaction rolled back, so a result produced inside it
    /// never took effect.
    #[error("enclosing transaction rolled back")]
    RolledBack,

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error, e.g. while reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        StoreError::LockPoisoned(err.to_string())
    }
}
