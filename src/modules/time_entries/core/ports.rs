// Ports define what the core needs from the outside world, without implementing it.
//
// Purpose
// - Describe the storage collaborators as traits: DataStore (persisted records) and Migrator
//   (schema upgrade run once at startup).
//
// Boundaries
// - No concrete input or output here. Adapters implement these traits in the adapters layer.
// - The on-disk format is the adapter's business; the core only sees typed records.
//
// Testing guidance
// - Use the in memory adapters; both can be taken offline or fed corrupted input.

use crate::modules::time_entries::core::record::TimeEntryRecord;
use crate::modules::time_entries::core::reference::{
    ClientData, ProjectData, TagData, TaskData, UserData, WorkspaceData,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataStoreError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("corrupted {kind:?} record: {reason}")]
    Corrupted { kind: RecordKind, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordKind {
    User,
    Workspace,
    Project,
    Client,
    Task,
    Tag,
    TimeEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum StoredRecord {
    User(UserData),
    Workspace(WorkspaceData),
    Project(ProjectData),
    Client(ClientData),
    Task(TaskData),
    Tag(TagData),
    TimeEntry(TimeEntryRecord),
}

impl StoredRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            StoredRecord::User(_) => RecordKind::User,
            StoredRecord::Workspace(_) => RecordKind::Workspace,
            StoredRecord::Project(_) => RecordKind::Project,
            StoredRecord::Client(_) => RecordKind::Client,
            StoredRecord::Task(_) => RecordKind::Task,
            StoredRecord::Tag(_) => RecordKind::Tag,
            StoredRecord::TimeEntry(_) => RecordKind::TimeEntry,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            StoredRecord::User(r) => &r.id,
            StoredRecord::Workspace(r) => &r.id,
            StoredRecord::Project(r) => &r.id,
            StoredRecord::Client(r) => &r.id,
            StoredRecord::Task(r) => &r.id,
            StoredRecord::Tag(r) => &r.id,
            StoredRecord::TimeEntry(r) => &r.id,
        }
    }
}

#[async_trait]
pub trait DataStore: Send + Sync {
    async fn load_all(&self, kind: RecordKind) -> Result<Vec<StoredRecord>, DataStoreError>;
    /// Inserts or replaces by (kind, id).
    async fn persist(&self, record: StoredRecord) -> Result<(), DataStoreError>;
    async fn remove(&self, kind: RecordKind, id: &str) -> Result<(), DataStoreError>;
    async fn clear(&self) -> Result<(), DataStoreError>;
}

/// Upgrades storage from `from` to `to`. Failure is a plain `false`; progress fractions lie in
/// [0, 1] and a successful run reports 1.0 exactly once, last.
#[async_trait]
pub trait Migrator: Send + Sync {
    async fn migrate(&self, from: u32, to: u32, progress: &(dyn Fn(f32) + Send + Sync)) -> bool;
}
