//! Foundation types for shelf.
//!
//! Every record in the underlying key-value store lives in a named collection
//! under a string key. This crate provides the identity model that maps a
//! domain value onto that location. Every other shelf crate depends on
//! `shelf-types`.
//!
//! # Key Types
//!
//! - [`Index`]: a `(collection, key)` pair naming one stored record
//! - [`Identifiable`]: a type with a stable, displayable identifier
//! - [`Persistable`]: an identifiable type stored in a fixed collection
//! - [`Item`]: an immutable pairing of a value and optional metadata

pub mod error;
pub mod identity;
pub mod index;
pub mod item;

pub use error::TypeError;
pub use identity::{index_for, key_for, Identifiable, Identifier, Persistable};
pub use index::Index;
pub use item::{zip_metadata, Item};
