//! The store: current [`State`], subscriber registry, and dispatch.
//!
//! # Notification order
//!
//! [`Store::dispatch`] applies the reducer under the state lock, releases
//! every lock, and then walks a snapshot of the subscriber list taken at
//! that moment:
//!
//! - subscribers run in registration order and receive the state current
//!   at the time they are called;
//! - a subscriber may dispatch again; the nested dispatch finishes its own
//!   pass before the outer pass moves on;
//! - a subscriber removed mid-pass is skipped for the rest of that pass;
//! - a subscriber added mid-pass is first called on the next dispatch.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::{debug, trace};

use crate::id::PromptId;
use crate::reducer::{Action, State, reduce};

/// Callback invoked after every dispatch.
pub type Listener<P, V> = dyn Fn(&State<P, V>) + Send + Sync;

/// Identifies one registration in a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

struct Subscriber<P, V> {
    id: SubscriberId,
    active: AtomicBool,
    listener: Box<Listener<P, V>>,
}

/// Removal path used by [`Done`](crate::prompt::Done) handles, which do not
/// know the payload type of the store they belong to.
pub(crate) trait PromptRemover: Send + Sync {
    fn remove_prompt(&self, id: PromptId);
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Owner of the pending-prompt state and its subscribers.
pub struct Store<P, V> {
    label: String,
    state: Mutex<State<P, V>>,
    subscribers: Mutex<Vec<Arc<Subscriber<P, V>>>>,
    next_subscriber: AtomicU64,
}

impl<P, V> Store<P, V> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: Mutex::new(State::new()),
            subscribers: Mutex::new(Vec::new()),
            next_subscriber: AtomicU64::new(0),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> State<P, V> {
        lock(&self.state).clone()
    }

    /// Apply `action` and notify subscribers.
    pub fn dispatch(&self, action: Action<P, V>) {
        let kind = action.kind();
        let prompt = action.prompt_id().clone();
        let (depth, previous) = {
            let mut state = lock(&self.state);
            let next = reduce(&state, action);
            let depth = next.len();
            (depth, std::mem::replace(&mut *state, next))
        };
        // A prompt dropped here may run its own Drop; keep that outside the lock.
        drop(previous);
        debug!(queue = %self.label, action = kind, %prompt, depth, "dispatch");

        let pass: Vec<Arc<Subscriber<P, V>>> = lock(&self.subscribers).clone();
        for subscriber in pass {
            if !subscriber.active.load(Ordering::Acquire) {
                continue;
            }
            trace!(queue = %self.label, subscriber = subscriber.id.0, "notify");
            let current = self.state();
            (subscriber.listener)(&current);
        }
    }

    /// Register `listener` for every future dispatch.
    ///
    /// The returned [`Subscription`] deregisters on
    /// [`unsubscribe`](Subscription::unsubscribe) or drop.
    pub fn subscribe(
        self: &Arc<Self>,
        listener: impl Fn(&State<P, V>) + Send + Sync + 'static,
    ) -> Subscription<P, V> {
        let id = SubscriberId(self.next_subscriber.fetch_add(1, Ordering::Relaxed));
        lock(&self.subscribers).push(Arc::new(Subscriber {
            id,
            active: AtomicBool::new(true),
            listener: Box::new(listener),
        }));
        trace!(queue = %self.label, subscriber = id.0, "subscribed");
        Subscription {
            id,
            store: Arc::downgrade(self),
        }
    }

    /// Remove a registration. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let mut subscribers = lock(&self.subscribers);
        if let Some(pos) = subscribers.iter().position(|s| s.id == id) {
            let removed = subscribers.remove(pos);
            removed.active.store(false, Ordering::Release);
            trace!(queue = %self.label, subscriber = id.0, "unsubscribed");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }
}

impl<P, V> PromptRemover for Store<P, V>
where
    P: Send + Sync,
    V: Send + Sync,
{
    fn remove_prompt(&self, id: PromptId) {
        self.dispatch(Action::Remove(id));
    }
}

impl<P, V> fmt::Debug for Store<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("label", &self.label)
            .field("state", &*lock(&self.state))
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

// ── Subscription ──────────────────────────────────────────────────────

/// Registration token returned by [`Store::subscribe`].
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription<P, V> {
    id: SubscriberId,
    store: Weak<Store<P, V>>,
}

impl<P, V> Subscription<P, V> {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Stop receiving notifications. Same as dropping the token.
    pub fn unsubscribe(self) {}

    /// Keep the registration for the lifetime of the store.
    pub fn detach(mut self) -> SubscriberId {
        self.store = Weak::new();
        self.id
    }
}

impl<P, V> Drop for Subscription<P, V> {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.unsubscribe(self.id);
        }
    }
}

impl<P, V> fmt::Debug for Subscription<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Prompt;

    type TestStore = Store<(), ()>;

    fn insert(store: &Arc<TestStore>, id: &str) {
        let weak: Weak<dyn PromptRemover> = Arc::downgrade(store) as Weak<dyn PromptRemover>;
        store.dispatch(Action::Insert(Prompt::create(PromptId::from(id), weak, |_| ())));
    }

    fn log() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[test]
    fn subscribers_called_in_registration_order_with_new_state() {
        let store = Arc::new(TestStore::new("test"));
        let calls = log();

        let c1 = calls.clone();
        let _s1 = store.subscribe(move |s| c1.lock().unwrap().push(format!("s1:{}", s.len())));
        let c2 = calls.clone();
        let _s2 = store.subscribe(move |s| c2.lock().unwrap().push(format!("s2:{}", s.len())));

        insert(&store, "1");
        assert_eq!(*calls.lock().unwrap(), vec!["s1:1", "s2:1"]);
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let store = Arc::new(TestStore::new("test"));
        let calls = log();
        let c = calls.clone();
        let sub = store.subscribe(move |_| c.lock().unwrap().push("hit".into()));

        insert(&store, "1");
        sub.unsubscribe();
        insert(&store, "2");

        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn unsubscribe_unknown_id_is_noop() {
        let store = Arc::new(TestStore::new("test"));
        let sub = store.subscribe(|_| {});
        let id = sub.id();
        drop(sub);
        store.unsubscribe(id);
        store.unsubscribe(SubscriberId(1234));
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn detached_subscription_survives_token() {
        let store = Arc::new(TestStore::new("test"));
        let calls = log();
        let c = calls.clone();
        let _id = store
            .subscribe(move |_| c.lock().unwrap().push("hit".into()))
            .detach();

        insert(&store, "1");
        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn self_unsubscribe_mid_pass_is_not_repeated() {
        let store = Arc::new(TestStore::new("test"));
        let calls = log();

        let slot: Arc<Mutex<Option<Subscription<(), ()>>>> = Arc::new(Mutex::new(None));
        let (c, s) = (calls.clone(), slot.clone());
        let sub = store.subscribe(move |_| {
            c.lock().unwrap().push("once".into());
            s.lock().unwrap().take();
        });
        *slot.lock().unwrap() = Some(sub);

        insert(&store, "1");
        insert(&store, "2");
        assert_eq!(*calls.lock().unwrap(), vec!["once"]);
    }

    #[test]
    fn subscriber_removed_by_earlier_one_is_skipped_in_same_pass() {
        let store = Arc::new(TestStore::new("test"));
        let calls = log();

        let victim: Arc<Mutex<Option<Subscription<(), ()>>>> = Arc::new(Mutex::new(None));
        let (c1, v) = (calls.clone(), victim.clone());
        let _s1 = store.subscribe(move |_| {
            c1.lock().unwrap().push("s1".into());
            v.lock().unwrap().take();
        });
        let c2 = calls.clone();
        *victim.lock().unwrap() =
            Some(store.subscribe(move |_| c2.lock().unwrap().push("s2".into())));

        insert(&store, "1");
        assert_eq!(*calls.lock().unwrap(), vec!["s1"]);
    }

    #[test]
    fn subscriber_added_mid_pass_waits_for_next_dispatch() {
        let store = Arc::new(TestStore::new("test"));
        let calls = log();
        let added: Arc<Mutex<Vec<Subscription<(), ()>>>> = Arc::new(Mutex::new(Vec::new()));

        let (c, a, st) = (calls.clone(), added.clone(), Arc::downgrade(&store));
        let _s1 = store.subscribe(move |_| {
            c.lock().unwrap().push("outer".into());
            let Some(store) = st.upgrade() else { return };
            if a.lock().unwrap().is_empty() {
                let c = c.clone();
                let sub = store.subscribe(move |_| c.lock().unwrap().push("late".into()));
                a.lock().unwrap().push(sub);
            }
        });

        insert(&store, "1");
        assert_eq!(*calls.lock().unwrap(), vec!["outer"]);
        insert(&store, "2");
        assert_eq!(*calls.lock().unwrap(), vec!["outer", "outer", "late"]);
    }

    #[test]
    fn nested_dispatch_completes_before_outer_pass_resumes() {
        let store = Arc::new(TestStore::new("test"));
        let calls = log();

        let (c1, st) = (calls.clone(), Arc::downgrade(&store));
        let _s1 = store.subscribe(move |s| {
            c1.lock().unwrap().push(format!("s1:{}", s.len()));
            if s.len() == 1
                && let Some(store) = st.upgrade()
            {
                insert(&store, "nested");
            }
        });
        let c2 = calls.clone();
        let _s2 = store.subscribe(move |s| c2.lock().unwrap().push(format!("s2:{}", s.len())));

        insert(&store, "1");
        // Nested pass (s1:2, s2:2) runs inside s1's first call; the outer
        // pass then resumes with s2, which sees the latest state.
        assert_eq!(*calls.lock().unwrap(), vec!["s1:1", "s1:2", "s2:2", "s2:2"]);
        assert_eq!(store.state().len(), 2);
    }

    #[test]
    fn remove_prompt_dispatches_remove() {
        let store = Arc::new(TestStore::new("test"));
        insert(&store, "1");
        insert(&store, "2");
        store.remove_prompt(PromptId::from("1"));
        assert_eq!(store.state().ids(), vec![PromptId::from("2")]);
    }
}
