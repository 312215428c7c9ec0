// Outcome of a time entry command, shared by every command use case.
//
// Purpose
// - A pure decide function looks at the current AppState and either accepts the command, listing
//   the records to persist and the messages to dispatch, or rejects it.
//
// Boundaries
// - `messages[i]` publishes the change stored by `persist[i]`; trailing messages have no record.
// - `commit` is the only place with side effects. Each record is written before its message is
//   dispatched, so a failed write stops the batch with state matching what storage holds.

use crate::application::errors::ApplicationError;
use crate::application::store::Store;
use crate::modules::time_entries::core::messages::Message;
use crate::modules::time_entries::core::ports::{DataStore, StoredRecord};
use crate::modules::time_entries::core::record::TimeEntryRecord;
use crate::modules::time_entries::core::state::AppState;
use crate::shared::core::primitives::EntityId;
use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecideError {
    #[error("no authenticated user")]
    NotAuthenticated,

    #[error("time entry {0} not found")]
    UnknownTimeEntry(EntityId),

    #[error("no time entry is running")]
    NothingRunning,

    #[error("time entry {0} is already running")]
    AlreadyRunning(EntityId),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Decision {
    Accepted {
        persist: Vec<StoredRecord>,
        messages: Vec<Message>,
    },
    Rejected {
        reason: DecideError,
    },
}

impl Decision {
    pub fn rejected(reason: DecideError) -> Self {
        Decision::Rejected { reason }
    }
}

/// Stop the running entry, if any, as part of another command.
pub fn stop_running(state: &AppState, at: DateTime<Utc>) -> Option<(StoredRecord, Message)> {
    let running = state.running_entry()?;
    let stopped = running.clone().stopped_at(at);
    Some((
        StoredRecord::TimeEntry(stopped),
        Message::TimeEntryStopped {
            id: running.id.clone(),
            at,
        },
    ))
}

/// Stops whatever runs, then publishes `running`, which must already be started.
pub fn start_after_stopping(state: &AppState, running: TimeEntryRecord, at: DateTime<Utc>) -> Decision {
    let mut persist = Vec::new();
    let mut messages = Vec::new();
    if let Some((stopped, message)) = stop_running(state, at) {
        persist.push(stopped);
        messages.push(message);
    }
    persist.push(StoredRecord::TimeEntry(running.clone()));
    messages.push(Message::TimeEntryStarted {
        record: running,
        at,
    });
    Decision::Accepted { persist, messages }
}

pub async fn commit<TDataStore>(
    decision: Decision,
    data_store: &TDataStore,
    store: &Store,
) -> Result<(), ApplicationError>
where
    TDataStore: DataStore + ?Sized,
{
    match decision {
        Decision::Accepted { persist, messages } => {
            let mut messages = messages.into_iter();
            for record in persist {
                data_store.persist(record).await?;
                if let Some(message) = messages.next() {
                    store.dispatch(message);
                }
            }
            messages.for_each(|message| store.dispatch(message));
            Ok(())
        }
        Decision::Rejected { reason } => Err(ApplicationError::Domain(reason.to_string())),
    }
}

#[cfg(test)]
mod decision_commit_tests {
    use super::*;
    use crate::application::store::StoreConfig;
    use crate::modules::time_entries::adapters::outbound::in_memory_data_store::InMemoryDataStore;
    use crate::modules::time_entries::core::ports::{DataStoreError, RecordKind};
    use crate::tests::fixtures::records::{TimeEntryRecordBuilder, at};
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Accepts a fixed number of writes, then fails like an offline backend.
    struct WriteBudgetDataStore {
        inner: InMemoryDataStore,
        writes_left: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl DataStore for WriteBudgetDataStore {
        async fn load_all(&self, kind: RecordKind) -> Result<Vec<StoredRecord>, DataStoreError> {
            self.inner.load_all(kind).await
        }

        async fn persist(&self, record: StoredRecord) -> Result<(), DataStoreError> {
            let granted = self
                .writes_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok();
            if !granted {
                return Err(DataStoreError::Backend("write budget exhausted".into()));
            }
            self.inner.persist(record).await
        }

        async fn remove(&self, kind: RecordKind, id: &str) -> Result<(), DataStoreError> {
            self.inner.remove(kind, id).await
        }

        async fn clear(&self) -> Result<(), DataStoreError> {
            self.inner.clear().await
        }
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_publish_only_the_records_that_were_written() {
        let store = Store::new(StoreConfig::default(), AppState::default());
        store.dispatch(Message::TimeEntryPut {
            record: TimeEntryRecordBuilder::new()
                .id("te-1")
                .start(at("2024-01-01T09:00:00Z"))
                .running()
                .build(),
        });
        let data_store = WriteBudgetDataStore {
            inner: InMemoryDataStore::new(),
            writes_left: AtomicUsize::new(1),
        };
        let next = TimeEntryRecordBuilder::new()
            .id("te-2")
            .start(at("2024-01-01T10:00:00Z"))
            .running()
            .build();
        let decision = start_after_stopping(&store.state(), next, at("2024-01-01T10:00:00Z"));

        let result = commit(decision, &data_store, &store).await;

        assert!(matches!(result, Err(ApplicationError::DataStore(_))));
        let state = store.state();
        assert!(state.running_entry().is_none());
        assert!(state.time_entries.get("te-2").is_none());
        let stored = data_store.load_all(RecordKind::TimeEntry).await.unwrap();
        assert!(matches!(
            stored.as_slice(),
            [StoredRecord::TimeEntry(record)] if record.id == "te-1" && !record.is_running()
        ));
    }
}
