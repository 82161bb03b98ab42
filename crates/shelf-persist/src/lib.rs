//! Typed persistence operations for shelf.
//!
//! Reads, writes and removals are built as operation values
//! ([`ReadOp`] / [`WriteOp`]) and then run against any execution context from
//! `shelf-context`: synchronously, asynchronously with a completion, as a
//! future, or as a deferred task. Each run is exactly one transaction.
//!
//! The record's [`Record`](shelf_codec::Record) impl decides, at compile
//! time, how its payload and metadata are encoded. Metadata-carrying
//! operations ([`ReadWithMetadata`], [`ReadMetadata`],
//! [`Write::with_metadata`]) only exist for records that carry metadata.
//!
//! # Families
//!
//! - [`Read`] -- by index, by key, batch, whole collection, existence filter
//! - [`Write`] -- single and batch, with or without metadata; echoes its input
//! - [`Remove`] -- single and batch, by value, key or index
//!
//! # Failure model
//!
//! - A missing record is `None` (or dropped from a batch), never an error.
//! - A record that cannot be decoded is logged and treated as missing.
//! - A value that cannot be encoded aborts the whole transaction with
//!   [`PersistError::Codec`].
//! - Store failures propagate unchanged as [`PersistError::Store`].

pub mod error;
pub mod ext;
pub mod op;
pub mod projection;
pub mod read;
pub mod remove;
pub mod write;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{PersistError, PersistResult};
pub use ext::PersistExt;
pub use op::{ReadOp, WriteOp};
pub use projection::{MetadataOnly, Plain, Projection, WithMetadata};
pub use read::{Existing, Read, ReadMetadata, ReadWithMetadata};
pub use remove::Remove;
pub use write::Write;
