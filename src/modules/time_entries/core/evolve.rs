// Evolve: combine the current state with one message to produce the next state.
//
// Purpose
// - One pure reducer per message kind, looked up through a registry.
//
// Boundaries
// - No input or output, no clock reads, no id generation. Same (state, message) gives the same
//   next state.
// - A reducer that would break a data-model invariant returns an error instead; `Reducers::reduce`
//   then keeps the prior state and raises `last_error` so the UI can react.

use crate::application::errors::StoreError;
use crate::modules::time_entries::core::errors::{InvariantViolation, ReduceError};
use crate::modules::time_entries::core::messages::{Message, MessageKind};
use crate::modules::time_entries::core::record::{SyncState, TimeEntryRecord};
use crate::modules::time_entries::core::state::{AppState, LoadInfo, TimeEntriesState};
use crate::shared::core::primitives::EntityId;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub type Reducer = fn(&AppState, &Message) -> Result<AppState, ReduceError>;

/// Result of feeding one handled message through its reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    pub state: AppState,
    pub refused: Option<ReduceError>,
}

#[derive(Clone)]
pub struct Reducers {
    table: HashMap<MessageKind, Reducer>,
}

impl Default for Reducers {
    fn default() -> Self {
        Self::empty()
            .register(MessageKind::ResetState, reset_state)
            .register(MessageKind::NoUserDataPut, no_user_data_put)
            .register(MessageKind::UserDataPut, user_data_put)
            .register(MessageKind::InitStateAfterMigration, init_state_after_migration)
            .register(MessageKind::ReferenceDataPut, reference_data_put)
            .register(MessageKind::TimeEntryPut, time_entry_put)
            .register(MessageKind::TimeEntryStarted, time_entry_started)
            .register(MessageKind::TimeEntryStopped, time_entry_stopped)
            .register(MessageKind::TimeEntryRemoved, time_entry_removed)
            .register(MessageKind::LoadMoreRequested, load_more_requested)
            .register(MessageKind::TimeEntriesLoaded, time_entries_loaded)
            .register(MessageKind::FullSyncRequested, full_sync_requested)
            .register(MessageKind::SyncCompleted, sync_completed)
            .register(MessageKind::GroupingChanged, grouping_changed)
            .register(MessageKind::ClockTicked, clock_ticked)
            .register(MessageKind::ErrorDismissed, error_dismissed)
    }
}

impl Reducers {
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    pub fn register(mut self, kind: MessageKind, reducer: Reducer) -> Self {
        self.table.insert(kind, reducer);
        self
    }

    pub fn handles(&self, kind: MessageKind) -> bool {
        self.table.contains_key(&kind)
    }

    pub fn reduce(&self, state: &AppState, message: &Message) -> Result<Reduction, StoreError> {
        let kind = message.kind();
        let reducer = self
            .table
            .get(&kind)
            .ok_or(StoreError::UnhandledMessageKind(kind))?;
        Ok(match reducer(state, message) {
            Ok(state) => Reduction {
                state,
                refused: None,
            },
            Err(reason) => Reduction {
                state: AppState {
                    last_error: Some(reason.clone()),
                    ..state.clone()
                },
                refused: Some(reason),
            },
        })
    }
}

fn mismatch(expected: MessageKind, message: &Message) -> ReduceError {
    ReduceError::PayloadMismatch {
        expected,
        actual: message.kind(),
    }
}

fn validate_record(record: &TimeEntryRecord) -> Result<(), InvariantViolation> {
    if record.workspace_id.is_empty() {
        return Err(InvariantViolation::MissingWorkspace(record.id.clone()));
    }
    if !record.has_consistent_stop() {
        return Err(InvariantViolation::StopTimeMismatch(record.id.clone()));
    }
    if record.is_running() != (record.duration < 0) {
        return Err(InvariantViolation::DurationEncodingMismatch(record.id.clone()));
    }
    Ok(())
}

fn validate_running(records: &BTreeMap<EntityId, TimeEntryRecord>) -> Result<(), InvariantViolation> {
    let running: Vec<EntityId> = records
        .values()
        .filter(|r| r.is_running() && !r.is_pending_delete())
        .map(|r| r.id.clone())
        .collect();
    if running.len() > 1 {
        return Err(InvariantViolation::MultipleRunningEntries(running));
    }
    Ok(())
}

fn with_records(
    state: &AppState,
    change: impl FnOnce(&mut BTreeMap<EntityId, TimeEntryRecord>) -> Result<(), ReduceError>,
) -> Result<AppState, ReduceError> {
    let mut next = state.clone();
    change(Arc::make_mut(&mut next.time_entries.records))?;
    validate_running(&next.time_entries.records)?;
    Ok(next)
}

/// Remote copies never overwrite records with unsynced local changes. A remote deletion clears a
/// local tombstone.
fn merge_remote(records: &mut BTreeMap<EntityId, TimeEntryRecord>, incoming: &[TimeEntryRecord]) -> Result<(), ReduceError> {
    for record in incoming {
        let local = records.get(&record.id).map(|local| local.sync_state);
        if record.is_pending_delete() {
            if matches!(local, Some(SyncState::Synced | SyncState::PendingDelete)) {
                records.remove(&record.id);
            }
            continue;
        }
        if local.is_some_and(|state| state != SyncState::Synced) {
            continue;
        }
        validate_record(record)?;
        records.insert(record.id.clone(), record.clone());
    }
    Ok(())
}

fn reset_state(state: &AppState, _message: &Message) -> Result<AppState, ReduceError> {
    Ok(AppState::with_settings(state.settings))
}

fn no_user_data_put(state: &AppState, _message: &Message) -> Result<AppState, ReduceError> {
    Ok(AppState {
        user: None,
        ..state.clone()
    })
}

fn user_data_put(state: &AppState, message: &Message) -> Result<AppState, ReduceError> {
    let Message::UserDataPut { user } = message else {
        return Err(mismatch(MessageKind::UserDataPut, message));
    };
    Ok(AppState {
        user: Some(user.clone()),
        ..state.clone()
    })
}

fn init_state_after_migration(state: &AppState, message: &Message) -> Result<AppState, ReduceError> {
    let Message::InitStateAfterMigration { snapshot } = message else {
        return Err(mismatch(MessageKind::InitStateAfterMigration, message));
    };
    let mut records = BTreeMap::new();
    for record in &snapshot.time_entries {
        if !record.is_pending_delete() {
            validate_record(record)?;
        }
        records.insert(record.id.clone(), record.clone());
    }
    validate_running(&records)?;
    Ok(AppState {
        time_entries: TimeEntriesState {
            records: Arc::new(records),
            load_info: LoadInfo::default(),
            now: state.time_entries.now,
        },
        reference: Arc::new(snapshot.reference.clone()),
        user: snapshot.user.clone(),
        settings: state.settings,
        last_error: None,
    })
}

fn reference_data_put(state: &AppState, message: &Message) -> Result<AppState, ReduceError> {
    let Message::ReferenceDataPut { data } = message else {
        return Err(mismatch(MessageKind::ReferenceDataPut, message));
    };
    let mut next = state.clone();
    Arc::make_mut(&mut next.reference).merge(data.clone());
    Ok(next)
}

fn time_entry_put(state: &AppState, message: &Message) -> Result<AppState, ReduceError> {
    let Message::TimeEntryPut { record } = message else {
        return Err(mismatch(MessageKind::TimeEntryPut, message));
    };
    with_records(state, |records| {
        validate_record(record)?;
        records.insert(record.id.clone(), record.clone());
        Ok(())
    })
}

fn time_entry_started(state: &AppState, message: &Message) -> Result<AppState, ReduceError> {
    let Message::TimeEntryStarted { record, at } = message else {
        return Err(mismatch(MessageKind::TimeEntryStarted, message));
    };
    let record = if record.is_running() {
        record.clone()
    } else {
        record.clone().started_at(*at)
    };
    let mut next = with_records(state, |records| {
        validate_record(&record)?;
        records.insert(record.id.clone(), record);
        Ok(())
    })?;
    next.time_entries.now = *at;
    Ok(next)
}

fn time_entry_stopped(state: &AppState, message: &Message) -> Result<AppState, ReduceError> {
    let Message::TimeEntryStopped { id, at } = message else {
        return Err(mismatch(MessageKind::TimeEntryStopped, message));
    };
    let mut next = with_records(state, |records| {
        let record = records
            .get_mut(id)
            .filter(|r| !r.is_pending_delete())
            .ok_or_else(|| ReduceError::UnknownTimeEntry(id.clone()))?;
        *record = record.clone().stopped_at(*at);
        Ok(())
    })?;
    next.time_entries.now = *at;
    Ok(next)
}

fn time_entry_removed(state: &AppState, message: &Message) -> Result<AppState, ReduceError> {
    let Message::TimeEntryRemoved { id } = message else {
        return Err(mismatch(MessageKind::TimeEntryRemoved, message));
    };
    with_records(state, |records| {
        let record = records
            .get_mut(id)
            .filter(|r| !r.is_pending_delete())
            .ok_or_else(|| ReduceError::UnknownTimeEntry(id.clone()))?;
        record.sync_state = SyncState::PendingDelete;
        Ok(())
    })
}

fn load_more_requested(state: &AppState, _message: &Message) -> Result<AppState, ReduceError> {
    let mut next = state.clone();
    next.time_entries.load_info.is_syncing = true;
    Ok(next)
}

fn time_entries_loaded(state: &AppState, message: &Message) -> Result<AppState, ReduceError> {
    let Message::TimeEntriesLoaded { records, has_more } = message else {
        return Err(mismatch(MessageKind::TimeEntriesLoaded, message));
    };
    let mut next = with_records(state, |existing| merge_remote(existing, records))?;
    next.time_entries.load_info = LoadInfo {
        is_syncing: false,
        has_more: *has_more,
        had_errors: false,
    };
    Ok(next)
}

fn full_sync_requested(state: &AppState, _message: &Message) -> Result<AppState, ReduceError> {
    let mut next = state.clone();
    next.time_entries.load_info.is_syncing = true;
    next.time_entries.load_info.had_errors = false;
    Ok(next)
}

fn sync_completed(state: &AppState, message: &Message) -> Result<AppState, ReduceError> {
    let Message::SyncCompleted { records, error } = message else {
        return Err(mismatch(MessageKind::SyncCompleted, message));
    };
    let mut next = with_records(state, |existing| merge_remote(existing, records))?;
    next.time_entries.load_info.is_syncing = false;
    next.time_entries.load_info.had_errors = error.is_some();
    next.last_error = error.clone().map(ReduceError::SyncFailed);
    Ok(next)
}

fn grouping_changed(state: &AppState, message: &Message) -> Result<AppState, ReduceError> {
    let Message::GroupingChanged { method } = message else {
        return Err(mismatch(MessageKind::GroupingChanged, message));
    };
    let mut next = state.clone();
    next.settings.group_method = *method;
    Ok(next)
}

fn clock_ticked(state: &AppState, message: &Message) -> Result<AppState, ReduceError> {
    let Message::ClockTicked { now } = message else {
        return Err(mismatch(MessageKind::ClockTicked, message));
    };
    let mut next = state.clone();
    next.time_entries.now = *now;
    Ok(next)
}

fn error_dismissed(state: &AppState, _message: &Message) -> Result<AppState, ReduceError> {
    Ok(AppState {
        last_error: None,
        ..state.clone()
    })
}
