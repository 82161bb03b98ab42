use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use shelf_store::StoreError;
use tracing::debug;
use uuid::Uuid;

/// Unique identifier of a deferred task (UUID v7, so ids sort by creation).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task:{}", self.0)
    }
}

/// Lifecycle of a deferred task.
///
/// `Pending -> Running -> Finished`, or `Pending -> Cancelled`. A task that
/// has started always runs to completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TaskState {
    Pending = 0,
    Running = 1,
    Finished = 2,
    Cancelled = 3,
}

impl TaskState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => TaskState::Pending,
            1 => TaskState::Running,
            2 => TaskState::Finished,
            _ => TaskState::Cancelled,
        }
    }
}

/// What happened when a task was run.
#[derive(Debug)]
pub enum TaskOutcome<E> {
    /// The task ran; this is the result of its transaction.
    Completed(Result<(), E>),
    /// The task was cancelled before it started.
    Cancelled,
}

impl<E> TaskOutcome<E> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TaskOutcome::Cancelled)
    }

    /// The transaction result, or `None` if the task was cancelled.
    pub fn into_result(self) -> Option<Result<(), E>> {
        match self {
            TaskOutcome::Completed(result) => Some(result),
            TaskOutcome::Cancelled => None,
        }
    }
}

/// Cancels a pending task from another thread or another owner.
#[derive(Clone)]
pub struct CancelHandle {
    id: TaskId,
    state: Arc<AtomicU8>,
}

impl CancelHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Cancel the task if it has not started. Returns `true` if this call
    /// (or an earlier one) cancelled it.
    pub fn cancel(&self) -> bool {
        let swapped = self.state.compare_exchange(
            TaskState::Pending as u8,
            TaskState::Cancelled as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        match swapped {
            Ok(_) => {
                debug!(task = %self.id, "cancelled deferred task");
                true
            }
            Err(current) => TaskState::from_u8(current) == TaskState::Cancelled,
        }
    }

    pub fn state(&self) -> TaskState {
        TaskState::from_u8(self.state.load(Ordering::SeqCst))
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}

/// A cancellable unit of work that performs one transaction when run.
///
/// Built by a [`DeferredContext`](crate::DeferredContext) and handed to an
/// external work queue, such as [`WorkQueue`](crate::WorkQueue).
pub struct DeferredTask<E = StoreError> {
    id: TaskId,
    label: String,
    state: Arc<AtomicU8>,
    work: Box<dyn FnOnce() -> Result<(), E> + Send>,
}

impl<E> DeferredTask<E> {
    pub fn new<F>(label: impl Into<String>, work: F) -> Self
    where
        F: FnOnce() -> Result<(), E> + Send + 'static,
    {
        Self {
            id: TaskId::new(),
            label: label.into(),
            state: Arc::new(AtomicU8::new(TaskState::Pending as u8)),
            work: Box::new(work),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> TaskState {
        TaskState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            id: self.id,
            state: Arc::clone(&self.state),
        }
    }

    /// Run the task on the current thread, unless it was cancelled.
    pub fn run(self) -> TaskOutcome<E> {
        let started = self.state.compare_exchange(
            TaskState::Pending as u8,
            TaskState::Running as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        if started.is_err() {
            debug!(task = %self.id, label = %self.label, "skipping cancelled task");
            return TaskOutcome::Cancelled;
        }

        debug!(task = %self.id, label = %self.label, "running deferred task");
        let result = (self.work)();
        self.state.store(TaskState::Finished as u8, Ordering::SeqCst);
        debug!(task = %self.id, ok = result.is_ok(), "deferred task finished");
        TaskOutcome::Completed(result)
    }
}

impl<E> fmt::Debug for DeferredTask<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredTask")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
