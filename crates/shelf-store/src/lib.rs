//! Transactional key-value store for shelf.
//!
//! The store keeps a flat model: every record lives in a named collection
//! under a string key and carries an opaque payload plus an optional opaque
//! metadata blob. All access happens inside a read or read-write transaction,
//! obtained from a connection, obtained from a database.
//!
//! # Traits
//!
//! - [`Database`] -- hands out new connections
//! - [`Connection`] -- runs read and read-write transactions, synchronously
//!   or on the runtime's blocking pool
//! - [`ReadTransaction`] / [`WriteTransaction`] -- the live transaction
//!
//! # Backends
//!
//! - [`InMemoryDatabase`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Write transactions are serialized; read transactions run concurrently.
//! 2. A read-write block that returns `Err` leaves the store untouched.
//! 3. The store never interprets payload or metadata bytes.
//! 4. Asynchronous completions are delivered on the caller's runtime handle,
//!    never on the thread that ran the transaction.

pub mod config;
pub mod error;
pub mod memory;
pub mod traits;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryConnection, InMemoryDatabase, StoreStats};
pub use traits::{Connection, Database, ReadTransaction, WriteTransaction};
