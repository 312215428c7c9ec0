// TimeEntryRecord is the leaf unit of tracked time.
//
// Duration encoding (kept bit-compatible with persisted and legacy data)
// - duration >= 0: elapsed seconds of a stopped entry.
// - duration < 0: the entry is running and duration is -(start as unix seconds), so the elapsed
//   time at `now` is `now + duration`.
//
// Invariants
// - `stop` is Some if and only if the entry is not Running.
// - At most one entry per user is Running. Enforced by the reducers, not here.

use crate::modules::time_entries::core::reference::{TrackingMode, UserData};
use crate::shared::core::primitives::{EntityId, local_date, new_entity_id};
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeEntryState {
    New,
    Running,
    Stopped,
}

/// Offline bookkeeping. Dirty local records win over remote copies until synced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SyncState {
    #[default]
    Synced,
    PendingSync,
    PendingDelete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntryRecord {
    pub id: EntityId,
    pub user_id: Option<EntityId>,
    pub workspace_id: EntityId,
    pub project_id: Option<EntityId>,
    pub task_id: Option<EntityId>,
    pub description: String,
    pub start: DateTime<Utc>,
    pub stop: Option<DateTime<Utc>>,
    pub duration: i64,
    pub billable: bool,
    pub duration_only: bool,
    pub tags: BTreeSet<EntityId>,
    pub state: TimeEntryState,
    pub sync_state: SyncState,
}

pub fn encode_running(start: DateTime<Utc>) -> i64 {
    -start.timestamp()
}

impl TimeEntryRecord {
    /// Blank entry for the authenticated user, or an unowned one when nobody is signed in.
    pub fn draft(user: Option<&UserData>, at: DateTime<Utc>) -> Self {
        Self {
            id: new_entity_id(),
            user_id: user.map(|u| u.id.clone()),
            workspace_id: user
                .map(|u| u.default_workspace_id.clone())
                .unwrap_or_default(),
            project_id: None,
            task_id: None,
            description: String::new(),
            start: at,
            stop: None,
            duration: 0,
            billable: false,
            duration_only: user.is_some_and(|u| u.tracking_mode == TrackingMode::Continue),
            tags: BTreeSet::new(),
            state: TimeEntryState::New,
            sync_state: SyncState::PendingSync,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == TimeEntryState::Running
    }

    /// Removed locally, kept until the server acknowledges the deletion.
    pub fn is_pending_delete(&self) -> bool {
        self.sync_state == SyncState::PendingDelete
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        if self.duration < 0 {
            now.timestamp().saturating_add(self.duration).max(0)
        } else {
            self.duration
        }
    }

    pub fn local_date(&self, offset: FixedOffset) -> chrono::NaiveDate {
        local_date(self.start, offset)
    }

    pub fn started_at(mut self, at: DateTime<Utc>) -> Self {
        self.start = at;
        self.stop = None;
        self.duration = encode_running(at);
        self.state = TimeEntryState::Running;
        self.sync_state = SyncState::PendingSync;
        self
    }

    pub fn stopped_at(mut self, at: DateTime<Utc>) -> Self {
        if !self.is_running() {
            return self;
        }
        self.duration = self.elapsed_seconds(at);
        let elapsed = TimeDelta::try_seconds(self.duration).unwrap_or(TimeDelta::MAX);
        self.stop = Some(
            self.start
                .checked_add_signed(elapsed)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        );
        self.state = TimeEntryState::Stopped;
        self.sync_state = SyncState::PendingSync;
        self
    }

    /// Resumes a stopped entry in place, carrying its elapsed time over.
    pub fn resumed_at(mut self, at: DateTime<Utc>) -> Self {
        let elapsed = self.elapsed_seconds(at);
        self.duration = elapsed.saturating_sub(at.timestamp());
        self.stop = None;
        self.state = TimeEntryState::Running;
        self.sync_state = SyncState::PendingSync;
        self
    }

    /// Duration-only entries started the same local day are resumed, anything else is copied
    /// into a fresh running entry.
    pub fn continued_at(&self, at: DateTime<Utc>, offset: FixedOffset) -> Self {
        if self.duration_only && self.local_date(offset) == local_date(at, offset) {
            return self.clone().resumed_at(at);
        }
        Self {
            id: new_entity_id(),
            user_id: self.user_id.clone(),
            workspace_id: self.workspace_id.clone(),
            project_id: self.project_id.clone(),
            task_id: self.task_id.clone(),
            description: self.description.clone(),
            start: at,
            stop: None,
            duration: 0,
            billable: self.billable,
            duration_only: self.duration_only,
            tags: self.tags.clone(),
            state: TimeEntryState::New,
            sync_state: SyncState::PendingSync,
        }
        .started_at(at)
    }

    pub fn has_consistent_stop(&self) -> bool {
        self.stop.is_some() != self.is_running()
    }
}
