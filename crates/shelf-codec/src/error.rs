/// Errors from encoding or decoding payload and metadata bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The value could not be serialized.
    #[error("encode failed: {0}")]
    Encode(String),

    /// The bytes could not be deserialized.
    #[error("decode failed: {0}")]
    Decode(String),

    /// A coder object decoded but did not yield a value.
    #[error("coder produced no value for {0}")]
    Coder(&'static str),

    /// Metadata bytes were handed to a type that carries no metadata.
    #[error("type carries no metadata")]
    NoMetadata,
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
