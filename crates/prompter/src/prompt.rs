//! Prompt entities and their completion handle.
//!
//! A [`Prompt`] pairs the caller's opaque payload with an identity and a
//! write-once future. The payload is produced by a render closure that
//! receives a [`Done`] handle: whatever UI the payload describes calls
//! [`Done::done`] (or [`Done::cancel`]) when the user answers.
//!
//! Completing a prompt settles its future first, then asks the owning
//! store to remove the prompt. Only the first completion does either.

use std::fmt;
use std::sync::{Arc, Weak};

use tracing::trace;

use crate::error::PromptError;
use crate::future::{Completer, FutureStatus, SettableFuture, settable};
use crate::id::PromptId;
use crate::store::PromptRemover;

/// Value a prompt resolves to. `None` means the prompt was cancelled.
pub type Answer<V> = Option<V>;

/// The awaitable side of a prompt.
pub type PromptFuture<V> = SettableFuture<Answer<V>, PromptError>;

// ── Done handle ───────────────────────────────────────────────────────

/// Completion capability for one prompt.
///
/// Cheap to clone; hand clones to every UI callback that can answer the
/// prompt. All clones share the same write-once future, so only the first
/// completion through any of them has an effect.
pub struct Done<V> {
    id: PromptId,
    completer: Completer<Answer<V>, PromptError>,
    store: Weak<dyn PromptRemover>,
}

impl<V> Done<V> {
    pub fn id(&self) -> &PromptId {
        &self.id
    }

    pub fn status(&self) -> FutureStatus {
        self.completer.status()
    }

    pub fn is_pending(&self) -> bool {
        self.status() == FutureStatus::Pending
    }

    /// Answer the prompt with `value`.
    pub fn done(&self, value: V) -> bool {
        self.complete(Some(value))
    }

    /// Dismiss the prompt without an answer. The future resolves to `None`.
    pub fn cancel(&self) -> bool {
        self.complete(None)
    }

    /// Settle the future with `answer` and remove the prompt from its queue.
    ///
    /// Returns `false` (and does nothing) if the prompt was already
    /// completed, cancelled, or failed.
    pub fn complete(&self, answer: Answer<V>) -> bool {
        if !self.completer.settle(answer) {
            trace!(prompt = %self.id, "ignoring repeated completion");
            return false;
        }
        self.remove();
        true
    }

    /// Reject the prompt's future and remove the prompt from its queue.
    pub fn fail(&self, error: PromptError) -> bool {
        if !self.completer.fail(error) {
            trace!(prompt = %self.id, "ignoring failure of settled prompt");
            return false;
        }
        self.remove();
        true
    }

    fn remove(&self) {
        if let Some(store) = self.store.upgrade() {
            store.remove_prompt(self.id.clone());
        }
    }
}

impl<V> Clone for Done<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            completer: self.completer.clone(),
            store: self.store.clone(),
        }
    }
}

impl<V> fmt::Debug for Done<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Done")
            .field("id", &self.id)
            .field("status", &self.status())
            .finish()
    }
}

// ── Prompt ────────────────────────────────────────────────────────────

/// One pending request for a user-supplied value.
pub struct Prompt<P, V> {
    id: PromptId,
    payload: P,
    done: Done<V>,
    future: PromptFuture<V>,
}

impl<P, V> Prompt<P, V> {
    /// Build a prompt, calling `render` exactly once to produce its payload.
    pub(crate) fn create<F>(id: PromptId, store: Weak<dyn PromptRemover>, render: F) -> Arc<Self>
    where
        F: FnOnce(Done<V>) -> P,
    {
        let (completer, future) = settable();
        let done = Done {
            id: id.clone(),
            completer,
            store,
        };
        let payload = render(done.clone());
        Arc::new(Self {
            id,
            payload,
            done,
            future,
        })
    }

    pub fn id(&self) -> &PromptId {
        &self.id
    }

    /// The opaque value the render closure produced.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn future(&self) -> &PromptFuture<V> {
        &self.future
    }

    pub fn status(&self) -> FutureStatus {
        self.future.status()
    }

    /// A clone of this prompt's completion handle.
    pub fn handle(&self) -> Done<V> {
        self.done.clone()
    }

    pub fn complete(&self, answer: Answer<V>) -> bool {
        self.done.complete(answer)
    }

    pub fn cancel(&self) -> bool {
        self.done.cancel()
    }
}

impl<P, V> Drop for Prompt<P, V> {
    fn drop(&mut self) {
        // Only reachable while pending when the owning queue is dropped;
        // wake the caller instead of leaving it suspended forever.
        self.done.completer.fail(PromptError::Abandoned);
    }
}

impl<P, V> fmt::Debug for Prompt<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prompt")
            .field("id", &self.id)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records removal requests instead of owning a real store.
    #[derive(Default)]
    struct RecordingRemover {
        removed: Mutex<Vec<PromptId>>,
    }

    impl PromptRemover for RecordingRemover {
        fn remove_prompt(&self, id: PromptId) {
            self.removed.lock().unwrap().push(id);
        }
    }

    fn prompt_with(
        remover: &Arc<RecordingRemover>,
        id: &str,
    ) -> Arc<Prompt<String, &'static str>> {
        let weak: Weak<dyn PromptRemover> = Arc::downgrade(remover) as Weak<dyn PromptRemover>;
        Prompt::create(PromptId::from(id), weak, |done| format!("payload for {}", done.id()))
    }

    #[test]
    fn render_runs_once_with_handle_for_same_prompt() {
        let remover = Arc::new(RecordingRemover::default());
        let mut calls = 0;
        let weak: Weak<dyn PromptRemover> = Arc::downgrade(&remover) as Weak<dyn PromptRemover>;
        let prompt: Arc<Prompt<PromptId, ()>> = Prompt::create(PromptId::from("7"), weak, |done| {
            calls += 1;
            done.id().clone()
        });
        assert_eq!(calls, 1);
        assert_eq!(prompt.payload(), prompt.id());
        assert_eq!(prompt.status(), FutureStatus::Pending);
    }

    #[test]
    fn complete_settles_then_requests_removal_once() {
        let remover = Arc::new(RecordingRemover::default());
        let prompt = prompt_with(&remover, "1");

        assert!(prompt.complete(Some("x")));
        assert!(!prompt.complete(Some("y")));
        assert!(!prompt.cancel());

        assert_eq!(prompt.future().peek(), Some(Ok(Some("x"))));
        assert_eq!(*remover.removed.lock().unwrap(), vec![PromptId::from("1")]);
    }

    #[test]
    fn cancel_resolves_to_none() {
        let remover = Arc::new(RecordingRemover::default());
        let prompt = prompt_with(&remover, "2");
        let handle = prompt.handle();

        assert!(handle.cancel());
        assert!(!handle.is_pending());
        assert_eq!(prompt.future().peek(), Some(Ok(None)));
    }

    #[test]
    fn fail_rejects_and_removes() {
        let remover = Arc::new(RecordingRemover::default());
        let prompt = prompt_with(&remover, "3");

        assert!(prompt.handle().fail(PromptError::rejected("nope")));
        assert!(!prompt.handle().done("late"));
        assert_eq!(prompt.status(), FutureStatus::Rejected);
        assert_eq!(
            prompt.future().peek(),
            Some(Err(PromptError::Rejected("nope".into())))
        );
        assert_eq!(remover.removed.lock().unwrap().len(), 1);
    }

    #[test]
    fn dropping_pending_prompt_abandons_future() {
        let remover = Arc::new(RecordingRemover::default());
        let prompt = prompt_with(&remover, "4");
        let future = prompt.future().clone();
        drop(prompt);

        assert_eq!(future.peek(), Some(Err(PromptError::Abandoned)));
        assert!(remover.removed.lock().unwrap().is_empty());
    }

    #[test]
    fn dropping_answered_prompt_keeps_answer() {
        let remover = Arc::new(RecordingRemover::default());
        let prompt = prompt_with(&remover, "5");
        let future = prompt.future().clone();
        prompt.handle().done("kept");
        drop(prompt);

        assert_eq!(future.peek(), Some(Ok(Some("kept"))));
    }

    #[test]
    fn completion_after_store_gone_still_settles() {
        let remover = Arc::new(RecordingRemover::default());
        let prompt = prompt_with(&remover, "6");
        drop(remover);

        assert!(prompt.handle().done("ok"));
        assert_eq!(prompt.future().peek(), Some(Ok(Some("ok"))));
    }
}
