use shelf_codec::CodecError;
use shelf_context::ContextError;
use shelf_store::StoreError;
use shelf_types::Index;

/// Errors from typed persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The store failed; the transaction was rolled back.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A value could not be encoded for writing; the transaction was rolled
    /// back.
    #[error("codec failure at {index}: {source}")]
    Codec { index: Index, source: CodecError },

    /// An asynchronous or deferred call did not deliver a result.
    #[error(transparent)]
    Context(ContextError),
}

/// Result alias for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

impl From<ContextError> for PersistError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::Store(store) => PersistError::Store(store),
            other => PersistError::Context(other),
        }
    }
}
