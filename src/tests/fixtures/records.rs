// Shared test fixtures for time entry records and the signed-in user.
// Compiled only under `cfg(test)` through `crate::tests::fixtures`.

use crate::modules::time_entries::core::record::{
    SyncState, TimeEntryRecord, TimeEntryState, encode_running,
};
use crate::modules::time_entries::core::reference::{TrackingMode, UserData};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeSet;

pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("fixture timestamps are valid RFC 3339")
        .with_timezone(&Utc)
}

pub fn user() -> UserData {
    UserData {
        id: "user-1".into(),
        name: "Ada".into(),
        email: "ada@example.com".into(),
        default_workspace_id: "ws-1".into(),
        tracking_mode: TrackingMode::StartNew,
    }
}

#[derive(Debug, Clone, Copy)]
enum Lifecycle {
    Running,
    Stopped(i64),
}

/// Builds a consistent record whatever order the setters are called in.
#[derive(Debug, Clone)]
pub struct TimeEntryRecordBuilder {
    id: String,
    user_id: Option<String>,
    workspace_id: String,
    project_id: Option<String>,
    task_id: Option<String>,
    description: String,
    start: DateTime<Utc>,
    lifecycle: Lifecycle,
    billable: bool,
    duration_only: bool,
    tags: BTreeSet<String>,
    sync_state: SyncState,
}

impl Default for TimeEntryRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TimeEntryRecordBuilder {
    pub fn new() -> Self {
        Self {
            id: "te-fixed-0001".into(),
            user_id: Some("user-1".into()),
            workspace_id: "ws-1".into(),
            project_id: None,
            task_id: None,
            description: "This is a test".into(),
            start: at("2024-01-01T09:00:00Z"),
            lifecycle: Lifecycle::Stopped(3600),
            billable: false,
            duration_only: false,
            tags: BTreeSet::new(),
            sync_state: SyncState::Synced,
        }
    }

    pub fn id(mut self, v: impl Into<String>) -> Self {
        self.id = v.into();
        self
    }

    pub fn user_id(mut self, v: impl Into<String>) -> Self {
        self.user_id = Some(v.into());
        self
    }

    pub fn workspace_id(mut self, v: impl Into<String>) -> Self {
        self.workspace_id = v.into();
        self
    }

    pub fn project_id(mut self, v: impl Into<String>) -> Self {
        self.project_id = Some(v.into());
        self
    }

    pub fn task_id(mut self, v: impl Into<String>) -> Self {
        self.task_id = Some(v.into());
        self
    }

    pub fn description(mut self, v: impl Into<String>) -> Self {
        self.description = v.into();
        self
    }

    pub fn start(mut self, v: DateTime<Utc>) -> Self {
        self.start = v;
        self
    }

    pub fn running(mut self) -> Self {
        self.lifecycle = Lifecycle::Running;
        self
    }

    pub fn stopped(mut self, seconds: i64) -> Self {
        self.lifecycle = Lifecycle::Stopped(seconds);
        self
    }

    pub fn billable(mut self, v: bool) -> Self {
        self.billable = v;
        self
    }

    pub fn duration_only(mut self, v: bool) -> Self {
        self.duration_only = v;
        self
    }

    pub fn tags(mut self, v: &[&str]) -> Self {
        self.tags = v.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn sync_state(mut self, v: SyncState) -> Self {
        self.sync_state = v;
        self
    }

    pub fn build(self) -> TimeEntryRecord {
        let (duration, stop, state) = match self.lifecycle {
            Lifecycle::Running => (encode_running(self.start), None, TimeEntryState::Running),
            Lifecycle::Stopped(seconds) => (
                seconds,
                Some(self.start + Duration::seconds(seconds)),
                TimeEntryState::Stopped,
            ),
        };
        TimeEntryRecord {
            id: self.id,
            user_id: self.user_id,
            workspace_id: self.workspace_id,
            project_id: self.project_id,
            task_id: self.task_id,
            description: self.description,
            start: self.start,
            stop,
            duration,
            billable: self.billable,
            duration_only: self.duration_only,
            tags: self.tags,
            state,
            sync_state: self.sync_state,
        }
    }
}

#[cfg(test)]
mod time_entry_record_builder_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_build_a_stopped_entry_by_default() {
        let record = TimeEntryRecordBuilder::default().build();
        assert_eq!(record.id, "te-fixed-0001");
        assert_eq!(record.state, TimeEntryState::Stopped);
        assert_eq!(record.duration, 3600);
        assert_eq!(record.stop, Some(at("2024-01-01T10:00:00Z")));
        assert!(record.has_consistent_stop());
    }

    #[rstest]
    fn it_should_not_depend_on_setter_order() {
        let a = TimeEntryRecordBuilder::new()
            .running()
            .start(at("2024-02-01T08:00:00Z"))
            .build();
        let b = TimeEntryRecordBuilder::new()
            .start(at("2024-02-01T08:00:00Z"))
            .running()
            .build();
        assert_eq!(a, b);
        assert_eq!(a.duration, -at("2024-02-01T08:00:00Z").timestamp());
    }
}
