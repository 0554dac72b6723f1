//! The public entry point: ask for a value, get a future back.
//!
//! ```
//! use prompter::PromptQueue;
//!
//! let queue: PromptQueue<String, bool> = PromptQueue::new();
//!
//! let answer = queue.prompt(|done| {
//!     // A real surface would keep `done` and call it from a button.
//!     done.done(true);
//!     "Continue?".to_string()
//! });
//! assert_eq!(answer.peek(), Some(Ok(Some(true))));
//! assert_eq!(queue.pending_count(), 0);
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, Weak};

use tracing::debug;

use crate::config::QueueConfig;
use crate::id::IdGenerator;
use crate::prompt::{Done, Prompt, PromptFuture};
use crate::reducer::{Action, State};
use crate::store::{PromptRemover, Store, Subscription};
use crate::view::{DisplayMode, PromptView};

/// A queue of pending prompts.
///
/// Cloning is cheap and every clone drives the same store. Use
/// [`PromptQueue::new`] for an isolated queue or [`global`] for the
/// process-wide one.
pub struct PromptQueue<P, V> {
    store: Arc<Store<P, V>>,
    ids: Arc<IdGenerator>,
    config: Arc<QueueConfig>,
}

impl<P, V> PromptQueue<P, V>
where
    P: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            store: Arc::new(Store::new(config.label.clone())),
            ids: Arc::new(IdGenerator::new()),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<Store<P, V>> {
        &self.store
    }

    /// Build a prompt bound to this queue without inserting it.
    ///
    /// `render` runs exactly once, before this returns.
    pub fn create_prompt<F>(&self, render: F) -> Arc<Prompt<P, V>>
    where
        F: FnOnce(Done<V>) -> P,
    {
        let remover = Arc::downgrade(&self.store) as Weak<dyn PromptRemover>;
        Prompt::create(self.ids.next_id(), remover, render)
    }

    /// Ask for a value.
    ///
    /// `render` receives the prompt's [`Done`] handle and returns the payload
    /// a rendering surface will display. The prompt is inserted at the front
    /// of the queue and its future is returned immediately; it resolves
    /// to `Some(value)` when answered or `None` when cancelled.
    pub fn prompt<F>(&self, render: F) -> PromptFuture<V>
    where
        F: FnOnce(Done<V>) -> P,
    {
        let prompt = self.create_prompt(render);
        let future = prompt.future().clone();
        if !future.is_pending() {
            debug!(queue = %self.config.label, prompt = %prompt.id(), "answered during render");
            return future;
        }

        // A handle that crossed threads may settle before the insert lands;
        // the reducer then leaves the stack alone.
        self.store.dispatch(Action::Insert(prompt));
        future
    }

    /// Register for change notifications. See [`Store::subscribe`].
    pub fn subscribe(
        &self,
        listener: impl Fn(&State<P, V>) + Send + Sync + 'static,
    ) -> Subscription<P, V> {
        self.store.subscribe(listener)
    }

    pub fn state(&self) -> State<P, V> {
        self.store.state()
    }

    pub fn pending_count(&self) -> usize {
        self.state().len()
    }

    /// Pending prompts laid out for `mode`.
    pub fn view(&self, mode: DisplayMode) -> Vec<PromptView<P, V>> {
        mode.select(&self.state())
    }

    /// Pending prompts laid out for the configured display mode.
    pub fn default_view(&self) -> Vec<PromptView<P, V>> {
        self.view(self.config.display_mode)
    }

    /// Cancel every pending prompt. Returns how many were cancelled.
    pub fn cancel_all(&self) -> usize {
        let state = self.state();
        let cancelled = state.render_stack().iter().filter(|p| p.cancel()).count();
        if cancelled > 0 {
            debug!(queue = %self.config.label, cancelled, "cancelled all pending prompts");
        }
        cancelled
    }
}

impl<P, V> Default for PromptQueue<P, V>
where
    P: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, V> Clone for PromptQueue<P, V> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            ids: self.ids.clone(),
            config: self.config.clone(),
        }
    }
}

impl<P, V> fmt::Debug for PromptQueue<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptQueue")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish()
    }
}

// ── Process-wide queues ───────────────────────────────────────────────

type GlobalQueues = Mutex<HashMap<TypeId, &'static (dyn Any + Send + Sync)>>;

static GLOBAL_QUEUES: OnceLock<GlobalQueues> = OnceLock::new();

/// The process-wide queue for payload `P` and answer `V`.
///
/// Created on first use and never dropped. Each `(P, V)` pair has its own
/// queue.
pub fn global<P, V>() -> &'static PromptQueue<P, V>
where
    P: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    let key = TypeId::of::<PromptQueue<P, V>>();
    let mut queues = GLOBAL_QUEUES
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(|e| e.into_inner());

    if let Some(queue) = queues
        .get(&key)
        .copied()
        .and_then(|q| q.downcast_ref::<PromptQueue<P, V>>())
    {
        return queue;
    }

    let queue: &'static PromptQueue<P, V> = Box::leak(Box::new(PromptQueue::with_config(
        QueueConfig::default().with_label("global"),
    )));
    queues.insert(key, queue);
    queue
}

/// [`PromptQueue::prompt`] on the process-wide queue for `(P, V)`.
pub fn prompt<P, V, F>(render: F) -> PromptFuture<V>
where
    P: Send + Sync + 'static,
    V: Send + Sync + 'static,
    F: FnOnce(Done<V>) -> P,
{
    global::<P, V>().prompt(render)
}
