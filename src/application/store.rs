// Store: the single owner of the current AppState.
//
// Purpose
// - Accept messages, run the registered reducer, publish the next state together with the
//   projected display rows and the diff from the previous rows.
//
// Ordering
// - `dispatch` enqueues. The first caller that finds the store idle drains the queue on its own
//   thread; everyone else returns at once and their messages are applied in arrival order by the
//   draining caller. At most one reducer runs at a time, and a subscriber may dispatch from inside
//   its callback without deadlocking.
//
// Boundaries
// - No input or output. Side effects belong to the use cases around `dispatch`.
// - Published states are never mutated; subscribers may keep the Arc as long as they like.

use crate::application::errors::StoreError;
use crate::modules::time_entries::core::evolve::Reducers;
use crate::modules::time_entries::core::messages::Message;
use crate::modules::time_entries::core::state::AppState;
use crate::modules::time_entries::projection::grouping::project_log;
use crate::modules::time_entries::projection::holders::DisplayRow;
use crate::shared::core::diff::{DiffOperation, diff};
use crate::shared::infrastructure::subscriptions::{SubscriptionId, Subscriptions, lock};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Panic on inconsistent display rows instead of asking subscribers to reload.
    pub strict_diff: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            strict_diff: cfg!(debug_assertions),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChange {
    Diff(Vec<DiffOperation<DisplayRow>>),
    /// The rows could not be diffed; rebind the whole list.
    Reload,
}

/// What every subscriber receives after an accepted message.
#[derive(Debug, Clone)]
pub struct StoreUpdate {
    pub state: Arc<AppState>,
    pub rows: Arc<Vec<DisplayRow>>,
    /// None when the rows did not change.
    pub change: Option<ListChange>,
}

struct Current {
    state: Arc<AppState>,
    rows: Arc<Vec<DisplayRow>>,
}

#[derive(Default)]
struct Pending {
    queue: VecDeque<Message>,
    draining: bool,
}

/// Frees the queue for the next caller if a reducer or subscriber panics mid-drain.
struct DrainGuard<'a> {
    pending: &'a Mutex<Pending>,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            lock(self.pending).draining = false;
        }
    }
}

pub struct Store {
    reducers: Reducers,
    config: StoreConfig,
    current: Mutex<Current>,
    pending: Mutex<Pending>,
    subscribers: Subscriptions<StoreUpdate>,
}

impl Store {
    pub fn new(config: StoreConfig, initial: AppState) -> Self {
        Self::with_reducers(Reducers::default(), config, initial)
    }

    pub fn with_reducers(reducers: Reducers, config: StoreConfig, initial: AppState) -> Self {
        let rows = project_log(&initial);
        Self {
            reducers,
            config,
            current: Mutex::new(Current {
                state: Arc::new(initial),
                rows: Arc::new(rows),
            }),
            pending: Mutex::new(Pending::default()),
            subscribers: Subscriptions::new(),
        }
    }

    pub fn state(&self) -> Arc<AppState> {
        lock(&self.current).state.clone()
    }

    pub fn rows(&self) -> Arc<Vec<DisplayRow>> {
        lock(&self.current).rows.clone()
    }

    pub fn subscribe(&self, callback: impl Fn(&StoreUpdate) + Send + Sync + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn subscribers(&self) -> usize {
        self.subscribers.len()
    }

    /// No notification starts for this subscription once this returns.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    pub fn dispatch(&self, message: Message) {
        {
            let mut pending = lock(&self.pending);
            pending.queue.push_back(message);
            if pending.draining {
                return;
            }
            pending.draining = true;
        }

        let _guard = DrainGuard {
            pending: &self.pending,
        };
        loop {
            let next = {
                let mut pending = lock(&self.pending);
                match pending.queue.pop_front() {
                    Some(message) => message,
                    None => {
                        pending.draining = false;
                        return;
                    }
                }
            };
            if let Some(update) = self.apply(next) {
                self.subscribers.notify(&update);
            }
        }
    }

    fn apply(&self, message: Message) -> Option<StoreUpdate> {
        let kind = message.kind();
        let mut current = lock(&self.current);

        let reduction = match self.reducers.reduce(&current.state, &message) {
            Ok(reduction) => reduction,
            Err(StoreError::UnhandledMessageKind(kind)) => {
                warn!(?kind, "ignoring message without a reducer");
                return None;
            }
        };
        if let Some(reason) = &reduction.refused {
            warn!(?kind, %reason, "reducer refused message");
        }

        let state = Arc::new(reduction.state);
        let (rows, change) = if projection_inputs_changed(&current.state, &state) {
            let rows = project_log(&state);
            let change = self.list_change(&current.rows, &rows);
            (Arc::new(rows), change)
        } else {
            (current.rows.clone(), None)
        };

        debug!(
            ?kind,
            operations = match &change {
                Some(ListChange::Diff(ops)) => ops.len(),
                _ => 0,
            },
            reload = matches!(change, Some(ListChange::Reload)),
            "message applied"
        );

        current.state = state.clone();
        current.rows = rows.clone();
        Some(StoreUpdate {
            state,
            rows,
            change,
        })
    }

    fn list_change(&self, old: &[DisplayRow], new: &[DisplayRow]) -> Option<ListChange> {
        match diff(old, new) {
            Ok(ops) if ops.is_empty() => None,
            Ok(ops) => Some(ListChange::Diff(ops)),
            Err(reason) => {
                error!(%reason, "display rows could not be diffed");
                if self.config.strict_diff {
                    panic!("inconsistent display rows: {reason}");
                }
                Some(ListChange::Reload)
            }
        }
    }
}

fn projection_inputs_changed(previous: &AppState, next: &AppState) -> bool {
    !Arc::ptr_eq(&previous.time_entries.records, &next.time_entries.records)
        || !Arc::ptr_eq(&previous.reference, &next.reference)
        || previous.time_entries.now != next.time_entries.now
        || previous.settings != next.settings
}
