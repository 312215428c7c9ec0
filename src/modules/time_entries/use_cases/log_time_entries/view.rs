// Log screen model: a local copy of the display rows kept in step with the store.
//
// Purpose
// - Stand in for a platform list view. Each published ListChange is applied to the local rows the
//   way an adapter would animate them; Reload, or a script that does not fit, rebinds everything.
//
// Boundaries
// - Reads state only through store updates. User intents go back through `dispatch`.

use crate::application::store::{ListChange, Store, StoreUpdate};
use crate::modules::time_entries::core::messages::Message;
use crate::modules::time_entries::core::state::{AppState, LoadInfo};
use crate::modules::time_entries::projection::grouping::GroupMethod;
use crate::modules::time_entries::projection::holders::DisplayRow;
use crate::shared::core::diff::apply;
use crate::shared::infrastructure::subscriptions::{SubscriptionId, lock};
use std::sync::{Arc, Mutex};
use tracing::warn;

#[derive(Debug, Clone, Default)]
struct Mirror {
    source: Arc<Vec<DisplayRow>>,
    rows: Vec<DisplayRow>,
    load_info: LoadInfo,
    running_duration: Option<i64>,
    reloads: usize,
    seeded: bool,
}

impl Mirror {
    fn seed(update_rows: Arc<Vec<DisplayRow>>, load_info: LoadInfo, running: Option<i64>) -> Self {
        Self {
            rows: update_rows.to_vec(),
            source: update_rows,
            load_info,
            running_duration: running,
            reloads: 0,
            seeded: true,
        }
    }

    fn follow(&mut self, update: &StoreUpdate) {
        self.load_info = update.state.time_entries.load_info;
        self.running_duration = running_duration(&update.state);
        if Arc::ptr_eq(&self.source, &update.rows) {
            return;
        }
        match &update.change {
            None => {}
            Some(ListChange::Diff(ops)) => match apply(std::mem::take(&mut self.rows), ops) {
                Ok(rows) => self.rows = rows,
                Err(reason) => {
                    warn!(%reason, "list change did not fit the mirrored rows");
                    self.reload(&update.rows);
                }
            },
            Some(ListChange::Reload) => self.reload(&update.rows),
        }
        self.source = update.rows.clone();
        self.seeded = true;
    }

    fn reload(&mut self, rows: &[DisplayRow]) {
        self.rows = rows.to_vec();
        self.reloads += 1;
    }
}

fn running_duration(state: &AppState) -> Option<i64> {
    state
        .running_entry()
        .map(|record| record.elapsed_seconds(state.time_entries.now))
}

pub struct LogTimeEntriesView {
    store: Arc<Store>,
    mirror: Arc<Mutex<Mirror>>,
    subscription: SubscriptionId,
}

impl LogTimeEntriesView {
    pub fn new(store: Arc<Store>) -> Self {
        let mirror = Arc::new(Mutex::new(Mirror::default()));
        let sink = mirror.clone();
        let subscription = store.subscribe(move |update| lock(&sink).follow(update));

        let state = store.state();
        let seed = Mirror::seed(
            store.rows(),
            state.time_entries.load_info,
            running_duration(&state),
        );
        {
            let mut current = lock(&mirror);
            if !current.seeded {
                *current = seed;
            }
        }

        Self {
            store,
            mirror,
            subscription,
        }
    }

    pub fn rows(&self) -> Vec<DisplayRow> {
        lock(&self.mirror).rows.clone()
    }

    pub fn load_info(&self) -> LoadInfo {
        lock(&self.mirror).load_info
    }

    pub fn is_running(&self) -> bool {
        lock(&self.mirror).running_duration.is_some()
    }

    /// Elapsed seconds of the running entry as of the store's clock.
    pub fn running_duration(&self) -> Option<i64> {
        lock(&self.mirror).running_duration
    }

    /// Number of full rebinds so far.
    pub fn reloads(&self) -> usize {
        lock(&self.mirror).reloads
    }

    /// Asks for the next page unless one is on its way or nothing is left.
    pub fn load_more(&self) -> bool {
        let info = self.load_info();
        if info.is_syncing || !info.has_more {
            return false;
        }
        self.store.dispatch(Message::LoadMoreRequested);
        true
    }

    pub fn change_grouping(&self, method: GroupMethod) {
        self.store.dispatch(Message::GroupingChanged { method });
    }
}

impl Drop for LogTimeEntriesView {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
    }
}

#[cfg(test)]
mod log_time_entries_view_tests {
    use super::*;
    use crate::application::store::StoreConfig;
    use crate::modules::time_entries::core::messages::PersistedSnapshot;
    use crate::tests::fixtures::records::{TimeEntryRecordBuilder, at};
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> Arc<Store> {
        let store = Arc::new(Store::new(StoreConfig::default(), AppState::default()));
        store.dispatch(Message::InitStateAfterMigration {
            snapshot: PersistedSnapshot {
                time_entries: vec![
                    TimeEntryRecordBuilder::new()
                        .id("te-1")
                        .start(at("2024-01-01T09:00:00Z"))
                        .build(),
                    TimeEntryRecordBuilder::new()
                        .id("te-2")
                        .start(at("2024-01-02T09:00:00Z"))
                        .build(),
                ],
                ..PersistedSnapshot::default()
            },
        });
        store
    }

    #[rstest]
    fn it_should_start_from_the_current_rows(store: Arc<Store>) {
        let view = LogTimeEntriesView::new(store.clone());
        assert_eq!(view.rows(), *store.rows());
        assert_eq!(view.rows().len(), 4);
        assert!(!view.is_running());
    }

    #[rstest]
    fn it_should_follow_every_change_through_diffs(store: Arc<Store>) {
        let view = LogTimeEntriesView::new(store.clone());
        store.dispatch(Message::TimeEntryPut {
            record: TimeEntryRecordBuilder::new()
                .id("te-3")
                .start(at("2024-01-01T12:00:00Z"))
                .description("Other")
                .build(),
        });
        store.dispatch(Message::TimeEntryRemoved { id: "te-2".into() });
        view.change_grouping(GroupMethod::Single);
        store.dispatch(Message::TimeEntryStarted {
            record: TimeEntryRecordBuilder::new().id("te-4").running().build(),
            at: at("2024-01-03T08:00:00Z"),
        });
        store.dispatch(Message::ClockTicked {
            now: at("2024-01-03T08:10:00Z"),
        });

        assert_eq!(view.rows(), *store.rows());
        assert_eq!(view.reloads(), 0);
        assert_eq!(view.running_duration(), Some(600));
    }

    #[rstest]
    fn it_should_request_more_only_when_idle(store: Arc<Store>) {
        let view = LogTimeEntriesView::new(store.clone());
        assert!(view.load_more());
        assert!(view.load_info().is_syncing);
        assert!(!view.load_more());
        store.dispatch(Message::TimeEntriesLoaded {
            records: vec![],
            has_more: false,
        });
        assert!(!view.load_more());
    }

    #[rstest]
    fn it_should_unsubscribe_when_dropped(store: Arc<Store>) {
        let view = LogTimeEntriesView::new(store.clone());
        assert_eq!(store.subscribers(), 1);
        drop(view);
        assert_eq!(store.subscribers(), 0);
    }
}
