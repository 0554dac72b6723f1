//! Write-once result cell with external completion.
//!
//! [`settable`] returns two halves that share one cell:
//!
//! - a [`Completer`], the only handle that can write the outcome, and
//! - a [`SettableFuture`], a read-only awaitable that any number of
//!   holders may clone and poll.
//!
//! The cell leaves [`FutureStatus::Pending`] exactly once. Every later
//! `settle`/`fail` is discarded and reports `false`.
//!
//! ```
//! use prompter::future::{FutureStatus, settable};
//!
//! let (completer, future) = settable::<u32, String>();
//! assert_eq!(future.status(), FutureStatus::Pending);
//!
//! assert!(completer.settle(7));
//! assert!(!completer.settle(8));
//! assert_eq!(future.peek(), Some(Ok(7)));
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll, Waker};

use serde::{Deserialize, Serialize};

/// Lifecycle of a settable cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FutureStatus {
    Pending,
    Resolved,
    Rejected,
}

struct Cell<T, E> {
    status: FutureStatus,
    outcome: Option<Result<T, E>>,
    wakers: Vec<Waker>,
}

type SharedCell<T, E> = Arc<Mutex<Cell<T, E>>>;

/// Poison only means a holder panicked mid-access; the cell's fields are
/// always written together, so the data is still consistent.
fn lock<T, E>(cell: &SharedCell<T, E>) -> MutexGuard<'_, Cell<T, E>> {
    cell.lock().unwrap_or_else(|e| e.into_inner())
}

/// Create a connected completer/future pair.
pub fn settable<T, E>() -> (Completer<T, E>, SettableFuture<T, E>) {
    let cell = Arc::new(Mutex::new(Cell {
        status: FutureStatus::Pending,
        outcome: None,
        wakers: Vec::new(),
    }));
    (
        Completer { cell: cell.clone() },
        SettableFuture { cell },
    )
}

// ── Completer ─────────────────────────────────────────────────────────

/// Write capability for a [`SettableFuture`].
pub struct Completer<T, E> {
    cell: SharedCell<T, E>,
}

impl<T, E> Completer<T, E> {
    /// Resolve with `value`. Returns `false` if the cell already left
    /// `Pending`, in which case `value` is dropped.
    pub fn settle(&self, value: T) -> bool {
        self.finish(Ok(value))
    }

    /// Reject with `error`. Returns `false` if the cell already left
    /// `Pending`.
    pub fn fail(&self, error: E) -> bool {
        self.finish(Err(error))
    }

    pub fn status(&self) -> FutureStatus {
        lock(&self.cell).status
    }

    fn finish(&self, outcome: Result<T, E>) -> bool {
        let wakers = {
            let mut cell = lock(&self.cell);
            if cell.status != FutureStatus::Pending {
                return false;
            }
            cell.status = if outcome.is_ok() {
                FutureStatus::Resolved
            } else {
                FutureStatus::Rejected
            };
            cell.outcome = Some(outcome);
            std::mem::take(&mut cell.wakers)
        };
        // Wake outside the lock; a woken task may poll immediately.
        for waker in wakers {
            waker.wake();
        }
        true
    }
}

impl<T, E> Clone for Completer<T, E> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Completer<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer")
            .field("status", &self.status())
            .finish()
    }
}

// ── SettableFuture ────────────────────────────────────────────────────

/// Read side of a settable cell.
///
/// Resolves to a clone of the stored outcome, so every clone of the future
/// observes the same value.
pub struct SettableFuture<T, E> {
    cell: SharedCell<T, E>,
}

impl<T, E> SettableFuture<T, E> {
    pub fn status(&self) -> FutureStatus {
        lock(&self.cell).status
    }

    pub fn is_pending(&self) -> bool {
        self.status() == FutureStatus::Pending
    }

    /// Whether `self` and `other` read the same cell.
    pub fn same_cell(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: Clone, E: Clone> SettableFuture<T, E> {
    /// The outcome if already settled, without registering a waker.
    pub fn peek(&self) -> Option<Result<T, E>> {
        lock(&self.cell).outcome.clone()
    }
}

impl<T: Clone, E: Clone> Future for SettableFuture<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut cell = lock(&self.cell);
        if let Some(outcome) = &cell.outcome {
            return Poll::Ready(outcome.clone());
        }
        if !cell.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            cell.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

impl<T, E> Clone for SettableFuture<T, E> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T, E> fmt::Debug for SettableFuture<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettableFuture")
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::time::Duration;

    #[test]
    fn pending_until_settled() {
        let (completer, future) = settable::<&str, ()>();
        assert!(future.is_pending());
        assert!(future.clone().now_or_never().is_none());

        assert!(completer.settle("yes"));
        assert_eq!(future.status(), FutureStatus::Resolved);
        assert_eq!(completer.status(), FutureStatus::Resolved);
        assert_eq!(future.now_or_never(), Some(Ok("yes")));
    }

    #[test]
    fn second_settle_is_discarded() {
        let (completer, future) = settable::<u8, ()>();
        assert!(completer.settle(1));
        assert!(!completer.settle(2));
        assert!(!completer.fail(()));
        assert_eq!(future.status(), FutureStatus::Resolved);
        assert_eq!(future.peek(), Some(Ok(1)));
    }

    #[test]
    fn fail_rejects_and_locks_status() {
        let (completer, future) = settable::<u8, String>();
        assert!(completer.fail("boom".into()));
        assert!(!completer.settle(3));
        assert_eq!(future.status(), FutureStatus::Rejected);
        assert_eq!(future.peek(), Some(Err("boom".to_string())));
    }

    #[test]
    fn cloned_completers_share_the_cell() {
        let (a, future) = settable::<u8, ()>();
        let b = a.clone();
        assert!(b.settle(9));
        assert!(!a.settle(10));
        assert_eq!(future.peek(), Some(Ok(9)));
    }

    #[test]
    fn clones_read_same_cell() {
        let (_completer, future) = settable::<u8, ()>();
        let other = future.clone();
        assert!(future.same_cell(&other));
        let (_c2, unrelated) = settable::<u8, ()>();
        assert!(!future.same_cell(&unrelated));
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&FutureStatus::Rejected).unwrap();
        assert_eq!(json, r#""rejected""#);
    }

    #[tokio::test]
    async fn every_awaiter_wakes_on_settle() {
        let (completer, future) = settable::<String, ()>();
        let first = tokio::spawn(future.clone());
        let second = tokio::spawn(future.clone());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(completer.settle("done".into()));

        assert_eq!(first.await.unwrap(), Ok("done".to_string()));
        assert_eq!(second.await.unwrap(), Ok("done".to_string()));
        assert_eq!(future.await, Ok("done".to_string()));
    }

    #[tokio::test]
    async fn settle_from_another_thread() {
        let (completer, future) = settable::<u32, ()>();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            completer.settle(5);
        });
        assert_eq!(future.await, Ok(5));
    }
}
