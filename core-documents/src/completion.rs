//! Single-use completion handles
//!
//! A [`Completion`] is the producer side of a one-shot result: it is consumed
//! by [`Completion::resolve`] or [`Completion::reject`], so a request can never
//! be completed twice. The caller awaits the paired [`PendingResult`].
//!
//! Dropping a `Completion` without using it settles the waiter with
//! [`DocumentError::ActivityDestroyed`]: the only way a pending request can
//! lose its producer is the host going away.

use crate::error::{DocumentError, Result};
use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio::sync::oneshot;

/// Create a connected completion handle and pending result.
pub fn completion<T>() -> (Completion<T>, PendingResult<T>) {
    let (sender, receiver) = oneshot::channel();
    (
        Completion { sender },
        PendingResult {
            receiver,
            taken: false,
        },
    )
}

/// Producer side of a single result.
#[derive(Debug)]
pub struct Completion<T> {
    sender: oneshot::Sender<Result<T>>,
}

impl<T> Completion<T> {
    /// Complete successfully.
    ///
    /// Returns `false` when the waiter has already gone away.
    pub fn resolve(self, value: T) -> bool {
        self.sender.send(Ok(value)).is_ok()
    }

    /// Complete with a failure.
    ///
    /// Returns `false` when the waiter has already gone away.
    pub fn reject(self, error: DocumentError) -> bool {
        self.sender.send(Err(error)).is_ok()
    }
}

/// Future resolving to the outcome of a request.
#[derive(Debug)]
pub struct PendingResult<T> {
    receiver: oneshot::Receiver<Result<T>>,
    taken: bool,
}

impl<T> PendingResult<T> {
    /// A result that is already settled with `error`.
    pub fn rejected(error: DocumentError) -> Self {
        let (completion, pending) = completion();
        completion.reject(error);
        pending
    }

    /// Take the outcome if it is available, without waiting.
    ///
    /// Returns `None` while the request is still outstanding and on every
    /// call after the outcome has been taken.
    pub fn try_result(&mut self) -> Option<Result<T>> {
        if self.taken {
            return None;
        }
        let outcome = match self.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => Err(DocumentError::ActivityDestroyed),
        };
        self.taken = true;
        Some(outcome)
    }
}

/// Polling again once the outcome has been taken, by `try_result` or an
/// earlier poll, is a caller bug and reports `ActivityDestroyed`.
impl<T> Future for PendingResult<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.taken {
            return Poll::Ready(Err(DocumentError::ActivityDestroyed));
        }
        let outcome = ready!(Pin::new(&mut self.receiver).poll(cx))
            .unwrap_or(Err(DocumentError::ActivityDestroyed));
        self.taken = true;
        Poll::Ready(outcome)
    }
}
