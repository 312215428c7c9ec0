// Subscriber registry with deferred removal.
//
// Rules
// - `notify` calls a snapshot of the callbacks taken when the round starts, so callbacks added
//   during a round first hear about the next one.
// - `unsubscribe` may run from any thread, including from inside a callback. A cancelled callback
//   is skipped for the rest of the round and purged once no round is in progress.
// - Callbacks run without any registry lock held.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// A panicking subscriber must not take the registry down with it.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Registry<T> {
    callbacks: Vec<(SubscriptionId, Callback<T>)>,
    cancelled: HashSet<SubscriptionId>,
    rounds: usize,
}

impl<T> Registry<T> {
    fn purge(&mut self) {
        if self.rounds == 0 && !self.cancelled.is_empty() {
            let cancelled = std::mem::take(&mut self.cancelled);
            self.callbacks.retain(|(id, _)| !cancelled.contains(id));
        }
    }
}

pub struct Subscriptions<T> {
    registry: Mutex<Registry<T>>,
    next_id: AtomicU64,
}

impl<T> Default for Subscriptions<T> {
    fn default() -> Self {
        Self {
            registry: Mutex::new(Registry {
                callbacks: Vec::new(),
                cancelled: HashSet::new(),
                rounds: 0,
            }),
            next_id: AtomicU64::new(1),
        }
    }
}

struct Round<'a, T> {
    registry: &'a Mutex<Registry<T>>,
}

impl<T> Drop for Round<'_, T> {
    fn drop(&mut self) {
        let mut registry = lock(self.registry);
        registry.rounds -= 1;
        registry.purge();
    }
}

impl<T> Subscriptions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.registry).callbacks.push((id, Arc::new(callback)));
        id
    }

    /// Returns false when the id is unknown or already cancelled.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = lock(&self.registry);
        let known = registry.callbacks.iter().any(|(existing, _)| *existing == id);
        if !known || !registry.cancelled.insert(id) {
            return false;
        }
        registry.purge();
        true
    }

    pub fn len(&self) -> usize {
        let registry = lock(&self.registry);
        registry.callbacks.len() - registry.cancelled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn notify(&self, value: &T) {
        let snapshot = {
            let mut registry = lock(&self.registry);
            registry.rounds += 1;
            registry.callbacks.clone()
        };
        let _round = Round {
            registry: &self.registry,
        };
        for (id, callback) in snapshot {
            if lock(&self.registry).cancelled.contains(&id) {
                continue;
            }
            callback(value);
        }
    }
}
