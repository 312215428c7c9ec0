// Closed catalog of state transitions the store accepts.
//
// Versioning and evolution
// - Prefer additive changes. Messages may be logged or replayed, so do not change the meaning of
//   an existing variant.
// - Every variant has a MessageKind tag; reducers are registered per tag.

use crate::modules::time_entries::core::record::TimeEntryRecord;
use crate::modules::time_entries::core::reference::{ReferenceData, UserData};
use crate::modules::time_entries::projection::grouping::GroupMethod;
use crate::shared::core::primitives::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything the storage layer hands over once a migration has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub user: Option<UserData>,
    pub reference: ReferenceData,
    pub time_entries: Vec<TimeEntryRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    ResetState,
    NoUserDataPut,
    UserDataPut {
        user: UserData,
    },
    InitStateAfterMigration {
        snapshot: PersistedSnapshot,
    },
    ReferenceDataPut {
        data: ReferenceData,
    },
    /// Created or updated locally.
    TimeEntryPut {
        record: TimeEntryRecord,
    },
    TimeEntryStarted {
        record: TimeEntryRecord,
        at: DateTime<Utc>,
    },
    TimeEntryStopped {
        id: EntityId,
        at: DateTime<Utc>,
    },
    TimeEntryRemoved {
        id: EntityId,
    },
    LoadMoreRequested,
    TimeEntriesLoaded {
        records: Vec<TimeEntryRecord>,
        has_more: bool,
    },
    FullSyncRequested,
    SyncCompleted {
        records: Vec<TimeEntryRecord>,
        error: Option<String>,
    },
    GroupingChanged {
        method: GroupMethod,
    },
    ClockTicked {
        now: DateTime<Utc>,
    },
    ErrorDismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MessageKind {
    ResetState,
    NoUserDataPut,
    UserDataPut,
    InitStateAfterMigration,
    ReferenceDataPut,
    TimeEntryPut,
    TimeEntryStarted,
    TimeEntryStopped,
    TimeEntryRemoved,
    LoadMoreRequested,
    TimeEntriesLoaded,
    FullSyncRequested,
    SyncCompleted,
    GroupingChanged,
    ClockTicked,
    ErrorDismissed,
}

impl MessageKind {
    pub const ALL: [MessageKind; 16] = [
        MessageKind::ResetState,
        MessageKind::NoUserDataPut,
        MessageKind::UserDataPut,
        MessageKind::InitStateAfterMigration,
        MessageKind::ReferenceDataPut,
        MessageKind::TimeEntryPut,
        MessageKind::TimeEntryStarted,
        MessageKind::TimeEntryStopped,
        MessageKind::TimeEntryRemoved,
        MessageKind::LoadMoreRequested,
        MessageKind::TimeEntriesLoaded,
        MessageKind::FullSyncRequested,
        MessageKind::SyncCompleted,
        MessageKind::GroupingChanged,
        MessageKind::ClockTicked,
        MessageKind::ErrorDismissed,
    ];
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::ResetState => MessageKind::ResetState,
            Message::NoUserDataPut => MessageKind::NoUserDataPut,
            Message::UserDataPut { .. } => MessageKind::UserDataPut,
            Message::InitStateAfterMigration { .. } => MessageKind::InitStateAfterMigration,
            Message::ReferenceDataPut { .. } => MessageKind::ReferenceDataPut,
            Message::TimeEntryPut { .. } => MessageKind::TimeEntryPut,
            Message::TimeEntryStarted { .. } => MessageKind::TimeEntryStarted,
            Message::TimeEntryStopped { .. } => MessageKind::TimeEntryStopped,
            Message::TimeEntryRemoved { .. } => MessageKind::TimeEntryRemoved,
            Message::LoadMoreRequested => MessageKind::LoadMoreRequested,
            Message::TimeEntriesLoaded { .. } => MessageKind::TimeEntriesLoaded,
            Message::FullSyncRequested => MessageKind::FullSyncRequested,
            Message::SyncCompleted { .. } => MessageKind::SyncCompleted,
            Message::GroupingChanged { .. } => MessageKind::GroupingChanged,
            Message::ClockTicked { .. } => MessageKind::ClockTicked,
            Message::ErrorDismissed => MessageKind::ErrorDismissed,
        }
    }
}
