//! Unidirectional state store.
//!
//! `Store` owns the current [`SessionState`] snapshot. Plain [`Action`]s go
//! through [`Store::dispatch`] and the pure reducer; asynchronous effects go
//! through [`Store::run`], which hands them a store handle so they can read
//! state and dispatch as they progress.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use crate::state::{Action, SessionState, reduce};

type Listener = Arc<dyn Fn() + Send + Sync>;

struct Inner {
    state: RwLock<Arc<SessionState>>,
    listeners: Mutex<BTreeMap<u64, Listener>>,
    next_listener_id: AtomicU64,
}

/// Handle to the session store.
///
/// Cloning is cheap and every clone refers to the same state. The store is
/// constructed explicitly and passed to whoever needs it.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

impl Store {
    /// Creates a store holding `initial`.
    pub fn new(initial: SessionState) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(Arc::new(initial)),
                listeners: Mutex::new(BTreeMap::new()),
                next_listener_id: AtomicU64::new(0),
            }),
        }
    }

    /// Returns the current snapshot.
    pub fn state(&self) -> Arc<SessionState> {
        let guard = self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Applies `action` synchronously.
    ///
    /// Subscribers are notified only when the reducer produced a new
    /// snapshot. They run after the state lock is released, so a listener
    /// may read state or dispatch again.
    pub fn dispatch(&self, action: Action) {
        let changed = {
            let mut guard = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let next = reduce(&guard, &action);
            let changed = !Arc::ptr_eq(&*guard, &next);
            *guard = next;
            changed
        };

        tracing::trace!("[Store] {} (changed: {})", action.kind(), changed);

        if changed {
            self.notify();
        }
    }

    /// Runs an orchestrating effect immediately and returns whatever it
    /// returns (typically a future).
    ///
    /// The effect receives its own store handle and may call
    /// [`dispatch`](Self::dispatch) and [`state`](Self::state) any number of
    /// times.
    pub fn run<F, R>(&self, effect: F) -> R
    where
        F: FnOnce(Store) -> R,
    {
        effect(self.clone())
    }

    /// Registers `listener`, called with no arguments after every committed
    /// state change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(listener));

        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn notify(&self) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        for listener in listeners {
            listener();
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(SessionState::init())
    }
}

/// Registration returned by [`Store::subscribe`].
///
/// Dropping it keeps the listener registered; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    id: u64,
    store: Weak<Inner>,
}

impl Subscription {
    /// Removes the listener. A no-op if the store is already gone.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&self.id);
        }
    }
}
