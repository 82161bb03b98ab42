//! Execution context ladder for shelf.
//!
//! Operations run against one of three tiers:
//!
//! - [`BoundRead`] / [`BoundWrite`] -- a live transaction, valid only for the
//!   call that supplied it; operations run immediately inside it
//! - [`ConnectionContext`] -- opens exactly one new transaction per call
//! - [`DatabaseContext`] -- opens exactly one new connection (and one
//!   transaction on it) per call
//!
//! Escalation only goes downward: a database context can hand out a
//! connection context, and every tier can hand a bound transaction to a
//! block. Nothing reaches back up from a bound transaction.
//!
//! Each tier supports some of these calling conventions, expressed as traits:
//!
//! - [`ReadContext`] / [`WriteContext`] -- synchronous
//! - [`AsyncContext`] -- completion delivered on an explicit
//!   `tokio::runtime::Handle`, or awaited through a [`Delivery`] future
//! - [`DeferredContext`] -- a cancellable [`DeferredTask`] for an external
//!   queue such as [`WorkQueue`]

pub mod bound;
pub mod connection;
pub mod database;
pub mod delivery;
pub mod error;
pub mod queue;
pub mod task;
pub mod traits;

pub use bound::{BoundRead, BoundWrite};
pub use connection::ConnectionContext;
pub use database::DatabaseContext;
pub use delivery::Delivery;
pub use error::{ContextError, ContextResult};
pub use queue::{TaskTicket, WorkQueue};
pub use task::{CancelHandle, DeferredTask, TaskId, TaskOutcome, TaskState};
pub use traits::{AsyncContext, DeferredContext, ReadContext, WriteContext};
