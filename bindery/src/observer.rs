//! Ordered multicast callback lists.
//!
//! Every event surface in this crate (property changing/changed, errors
//! changed, command executability, command faults) is an [`ObserverList`].
//!
//! # Invariants
//!
//! 1. Callbacks run synchronously, in registration order.
//! 2. The list is snapshotted before dispatch, so a callback may subscribe or
//!    unsubscribe without deadlocking; the change applies from the next emit.
//! 3. A [`SubscriptionId`] is never reused within one list.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Handle returned by [`ObserverList::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Thread-safe, ordered list of event callbacks.
pub struct ObserverList<E> {
    next_id: AtomicU64,
    observers: Mutex<Vec<(SubscriptionId, Callback<E>)>>,
}

impl<E> ObserverList<E> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Register a callback. It runs on every subsequent [`emit`](Self::emit).
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.observers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((id, Arc::new(callback)));
        id
    }

    /// Remove a callback. Returns `false` if the handle is unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self
            .observers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.observers
            .lock()
            .map(|guard| guard.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    /// Returns `true` if nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call every registered callback with `event`.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = self
            .observers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in snapshot {
            callback(event);
        }
    }
}

impl<E> Default for ObserverList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for ObserverList<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("observers", &self.len())
            .finish()
    }
}
