// AppState is the single immutable root of application truth at a point in time.
//
// Purpose
// - Hold every known time entry, the reference data they point at, the authenticated user and the
//   transient fields the list screen reacts to.
//
// Boundaries
// - Never mutated once published. Reducers clone what they change; the large maps sit behind Arc
//   so that untouched sections are shared between consecutive states.
// - No input or output.

use crate::modules::time_entries::core::errors::ReduceError;
use crate::modules::time_entries::core::record::TimeEntryRecord;
use crate::modules::time_entries::core::reference::{ReferenceData, UserData};
use crate::modules::time_entries::projection::grouping::GroupMethod;
use crate::shared::core::primitives::{EntityId, utc_offset};
use chrono::{DateTime, FixedOffset, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Footer state of the paged list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadInfo {
    pub is_syncing: bool,
    pub has_more: bool,
    pub had_errors: bool,
}

impl Default for LoadInfo {
    fn default() -> Self {
        Self {
            is_syncing: false,
            has_more: true,
            had_errors: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntriesState {
    pub records: Arc<BTreeMap<EntityId, TimeEntryRecord>>,
    pub load_info: LoadInfo,
    /// Clock reading used for running estimates. Only messages move it.
    pub now: DateTime<Utc>,
}

impl Default for TimeEntriesState {
    fn default() -> Self {
        Self {
            records: Arc::default(),
            load_info: LoadInfo::default(),
            now: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

impl TimeEntriesState {
    /// Records not pending deletion.
    pub fn live(&self) -> impl Iterator<Item = &TimeEntryRecord> {
        self.records.values().filter(|r| !r.is_pending_delete())
    }

    pub fn running(&self) -> impl Iterator<Item = &TimeEntryRecord> {
        self.live().filter(|r| r.is_running())
    }

    pub fn get(&self, id: &str) -> Option<&TimeEntryRecord> {
        self.records.get(id).filter(|r| !r.is_pending_delete())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub group_method: GroupMethod,
    pub utc_offset: FixedOffset,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            group_method: GroupMethod::ByDateAndTask,
            utc_offset: utc_offset(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub time_entries: TimeEntriesState,
    pub reference: Arc<ReferenceData>,
    pub user: Option<UserData>,
    pub settings: Settings,
    pub last_error: Option<ReduceError>,
}

impl AppState {
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn running_entry(&self) -> Option<&TimeEntryRecord> {
        self.time_entries.running().next()
    }
}
