// Upgrades storage written by the first app generation (schema version 0) to current records.
//
// Responsibilities
// - Parse the v0 JSON dump, convert every record and persist it through the DataStore port.
// - Report progress once per persisted record; the last report is 1.0 and it is the only one.
// - Return false on corrupted input or a failing backend. Never panic.
//
// Legacy conventions kept as is
// - Numeric ids become their decimal string.
// - `duration` already uses the signed encoding (negative = running since -duration).

use crate::modules::time_entries::core::ports::{DataStore, Migrator, RecordKind, StoredRecord};
use crate::modules::time_entries::core::record::{SyncState, TimeEntryRecord, TimeEntryState};
use crate::modules::time_entries::core::reference::{
    ClientData, ProjectData, TagData, TaskData, TrackingMode, UserData, WorkspaceData,
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
enum LegacyError {
    #[error("unreadable legacy dump: {0}")]
    Parse(String),

    #[error("legacy {kind:?} {id} is corrupted: {reason}")]
    Corrupted {
        kind: RecordKind,
        id: u64,
        reason: &'static str,
    },
}

#[derive(Debug, Default, Deserialize)]
struct LegacyDump {
    #[serde(default)]
    user: Option<LegacyUser>,
    #[serde(default)]
    workspaces: Vec<LegacyWorkspace>,
    #[serde(default)]
    projects: Vec<LegacyProject>,
    #[serde(default)]
    clients: Vec<LegacyClient>,
    #[serde(default)]
    tasks: Vec<LegacyTask>,
    #[serde(default)]
    tags: Vec<LegacyTag>,
    #[serde(default)]
    time_entries: Vec<LegacyTimeEntry>,
}

#[derive(Debug, Deserialize)]
struct LegacyUser {
    id: u64,
    name: String,
    email: String,
    default_wid: u64,
    #[serde(default)]
    duronly: bool,
}

#[derive(Debug, Deserialize)]
struct LegacyWorkspace {
    id: u64,
    name: String,
    #[serde(default)]
    premium: bool,
}

#[derive(Debug, Deserialize)]
struct LegacyProject {
    id: u64,
    wid: u64,
    cid: Option<u64>,
    name: String,
    #[serde(default)]
    color: u32,
}

#[derive(Debug, Deserialize)]
struct LegacyClient {
    id: u64,
    wid: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct LegacyTask {
    id: u64,
    pid: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct LegacyTag {
    id: u64,
    wid: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct LegacyTimeEntry {
    id: u64,
    uid: Option<u64>,
    wid: u64,
    pid: Option<u64>,
    tid: Option<u64>,
    #[serde(default)]
    description: String,
    start: DateTime<Utc>,
    stop: Option<DateTime<Utc>>,
    duration: i64,
    #[serde(default)]
    billable: bool,
    #[serde(default)]
    duronly: bool,
    #[serde(default)]
    tags: Vec<u64>,
    #[serde(default)]
    dirty: bool,
    #[serde(default)]
    deleted: bool,
}

impl LegacyTimeEntry {
    fn upgrade(self) -> Result<TimeEntryRecord, LegacyError> {
        let corrupted = |reason| LegacyError::Corrupted {
            kind: RecordKind::TimeEntry,
            id: self.id,
            reason,
        };
        let running = self.duration < 0;
        let stop = match (running, self.stop) {
            (true, Some(_)) => return Err(corrupted("running entry with a stop time")),
            (true, None) => None,
            (false, Some(stop)) if stop < self.start => {
                return Err(corrupted("stop time before start time"));
            }
            (false, Some(stop)) => Some(stop),
            (false, None) => Some(
                Duration::try_seconds(self.duration)
                    .and_then(|elapsed| self.start.checked_add_signed(elapsed))
                    .ok_or_else(|| corrupted("duration out of range"))?,
            ),
        };
        let sync_state = if self.deleted {
            SyncState::PendingDelete
        } else if self.dirty {
            SyncState::PendingSync
        } else {
            SyncState::Synced
        };
        Ok(TimeEntryRecord {
            id: self.id.to_string(),
            user_id: self.uid.map(|id| id.to_string()),
            workspace_id: self.wid.to_string(),
            project_id: self.pid.map(|id| id.to_string()),
            task_id: self.tid.map(|id| id.to_string()),
            description: self.description,
            start: self.start,
            stop,
            duration: self.duration,
            billable: self.billable,
            duration_only: self.duronly,
            tags: self.tags.iter().map(u64::to_string).collect(),
            state: if running {
                TimeEntryState::Running
            } else {
                TimeEntryState::Stopped
            },
            sync_state,
        })
    }
}

impl LegacyDump {
    fn parse(raw: &str) -> Result<Self, LegacyError> {
        serde_json::from_str(raw).map_err(|e| LegacyError::Parse(e.to_string()))
    }

    fn upgrade(self) -> Result<Vec<StoredRecord>, LegacyError> {
        let mut records = Vec::new();
        if let Some(user) = self.user {
            records.push(StoredRecord::User(UserData {
                id: user.id.to_string(),
                name: user.name,
                email: user.email,
                default_workspace_id: user.default_wid.to_string(),
                tracking_mode: if user.duronly {
                    TrackingMode::Continue
                } else {
                    TrackingMode::StartNew
                },
            }));
        }
        records.extend(self.workspaces.into_iter().map(|w| {
            StoredRecord::Workspace(WorkspaceData {
                id: w.id.to_string(),
                name: w.name,
                is_premium: w.premium,
            })
        }));
        records.extend(self.projects.into_iter().map(|p| {
            StoredRecord::Project(ProjectData {
                id: p.id.to_string(),
                workspace_id: p.wid.to_string(),
                client_id: p.cid.map(|id| id.to_string()),
                name: p.name,
                color: p.color,
            })
        }));
        records.extend(self.clients.into_iter().map(|c| {
            StoredRecord::Client(ClientData {
                id: c.id.to_string(),
                workspace_id: c.wid.to_string(),
                name: c.name,
            })
        }));
        records.extend(self.tasks.into_iter().map(|t| {
            StoredRecord::Task(TaskData {
                id: t.id.to_string(),
                project_id: t.pid.to_string(),
                name: t.name,
            })
        }));
        records.extend(self.tags.into_iter().map(|t| {
            StoredRecord::Tag(TagData {
                id: t.id.to_string(),
                workspace_id: t.wid.to_string(),
                name: t.name,
            })
        }));
        for entry in self.time_entries {
            records.push(StoredRecord::TimeEntry(entry.upgrade()?));
        }
        Ok(records)
    }
}

pub struct LegacyStorageMigrator<TDataStore>
where
    TDataStore: DataStore + 'static,
{
    legacy_dump: String,
    target: Arc<TDataStore>,
}

impl<TDataStore> LegacyStorageMigrator<TDataStore>
where
    TDataStore: DataStore + 'static,
{
    pub fn new(legacy_dump: impl Into<String>, target: Arc<TDataStore>) -> Self {
        Self {
            legacy_dump: legacy_dump.into(),
            target,
        }
    }
}

#[async_trait::async_trait]
impl<TDataStore> Migrator for LegacyStorageMigrator<TDataStore>
where
    TDataStore: DataStore + 'static,
{
    async fn migrate(&self, from: u32, to: u32, progress: &(dyn Fn(f32) + Send + Sync)) -> bool {
        if from == to {
            progress(1.0);
            return true;
        }
        if from > to || to > SCHEMA_VERSION {
            warn!(from, to, "unsupported storage migration");
            return false;
        }

        info!(from, to, "migrating storage");
        let records = match LegacyDump::parse(&self.legacy_dump).and_then(LegacyDump::upgrade) {
            Ok(records) => records,
            Err(reason) => {
                warn!(%reason, "legacy storage could not be read");
                return false;
            }
        };

        let total = records.len();
        if total == 0 {
            progress(1.0);
        }
        for (done, record) in records.into_iter().enumerate() {
            if let Err(reason) = self.target.persist(record).await {
                warn!(%reason, "migrated record could not be persisted");
                return false;
            }
            let done = done + 1;
            progress(if done == total {
                1.0
            } else {
                done as f32 / total as f32
            });
        }
        info!(records = total, "storage migrated");
        true
    }
}
