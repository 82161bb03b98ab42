use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::ContextError;

/// A future resolving to the result of an asynchronous transaction.
///
/// Resolves once the completion has been delivered on the runtime handle
/// passed to the call. If the completion is dropped instead, the future
/// yields [`ContextError::CompletionDropped`].
#[must_use = "futures do nothing unless awaited"]
pub struct Delivery<T, E> {
    receiver: oneshot::Receiver<Result<T, E>>,
}

impl<T, E> Delivery<T, E> {
    /// A delivery and the completion that resolves it.
    pub fn channel() -> (impl FnOnce(Result<T, E>) + Send + 'static, Self)
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let completion = move |result: Result<T, E>| {
            let _ = sender.send(result);
        };
        (completion, Self { receiver })
    }
}

impl<T, E: From<ContextError>> Future for Delivery<T, E> {
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|received| match received {
            Ok(result) => result,
            Err(_) => Err(ContextError::CompletionDropped.into()),
        })
    }
}

impl<T, E> std::fmt::Debug for Delivery<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delivery").finish_non_exhaustive()
    }
}
