use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("malformed index bytes: {0}")]
    MalformedIndex(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
