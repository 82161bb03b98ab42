use shelf_store::StoreError;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{ContextError, ContextResult};
use crate::task::{CancelHandle, DeferredTask, TaskId, TaskOutcome};

struct Job<E> {
    task: DeferredTask<E>,
    reply: oneshot::Sender<TaskOutcome<E>>,
}

/// A FIFO work queue that runs deferred tasks one at a time.
///
/// A worker task on the runtime pulls tasks in enqueue order and runs each on
/// the blocking pool. Cancelling a queued task makes the worker skip it.
pub struct WorkQueue<E = StoreError> {
    sender: mpsc::UnboundedSender<Job<E>>,
    worker: JoinHandle<()>,
}

impl<E: Send + 'static> WorkQueue<E> {
    /// Start a queue whose worker runs on `runtime`.
    pub fn start(runtime: &Handle) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job<E>>();
        let blocking = runtime.clone();
        let worker = runtime.spawn(async move {
            while let Some(Job { task, reply }) = receiver.recv().await {
                let id = task.id();
                match blocking.spawn_blocking(move || task.run()).await {
                    Ok(outcome) => {
                        let _ = reply.send(outcome);
                    }
                    Err(err) => {
                        warn!(task = %id, error = %err, "deferred task aborted");
                    }
                }
            }
            debug!("work queue drained");
        });
        Self { sender, worker }
    }

    /// Queue `task` behind every task already queued.
    pub fn enqueue(&self, task: DeferredTask<E>) -> ContextResult<TaskTicket<E>> {
        let (reply, outcome) = oneshot::channel();
        let ticket = TaskTicket {
            id: task.id(),
            cancel: task.cancel_handle(),
            outcome,
        };
        debug!(task = %ticket.id, label = task.label(), "enqueued deferred task");
        self.sender
            .send(Job { task, reply })
            .map_err(|_| ContextError::QueueClosed)?;
        Ok(ticket)
    }

    /// Stop accepting tasks and wait for the queued ones to finish.
    pub async fn shutdown(self) -> ContextResult<()> {
        drop(self.sender);
        self.worker.await.map_err(|_| ContextError::TaskAborted)
    }
}

impl<E> std::fmt::Debug for WorkQueue<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkQueue")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

/// Receipt for a queued task.
#[derive(Debug)]
pub struct TaskTicket<E> {
    id: TaskId,
    cancel: CancelHandle,
    outcome: oneshot::Receiver<TaskOutcome<E>>,
}

impl<E> TaskTicket<E> {
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Cancel the task if it has not started yet.
    pub fn cancel(&self) -> bool {
        self.cancel.cancel()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Wait for the task's outcome.
    pub async fn outcome(self) -> ContextResult<TaskOutcome<E>> {
        self.outcome.await.map_err(|_| ContextError::TaskAborted)
    }
}
