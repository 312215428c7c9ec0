#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeSet;
use time_tracking::modules::time_entries::core::record::{
    SyncState, TimeEntryRecord, TimeEntryState, encode_running,
};

pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("fixture timestamps are valid RFC 3339")
        .with_timezone(&Utc)
}

pub fn stopped(id: &str, start: DateTime<Utc>, seconds: i64) -> TimeEntryRecord {
    TimeEntryRecord {
        id: id.to_string(),
        user_id: Some("user-1".into()),
        workspace_id: "ws-1".into(),
        project_id: None,
        task_id: None,
        description: String::new(),
        start,
        stop: Some(start + Duration::seconds(seconds)),
        duration: seconds,
        billable: false,
        duration_only: false,
        tags: BTreeSet::new(),
        state: TimeEntryState::Stopped,
        sync_state: SyncState::Synced,
    }
}

pub fn running(id: &str, start: DateTime<Utc>) -> TimeEntryRecord {
    TimeEntryRecord {
        stop: None,
        duration: encode_running(start),
        state: TimeEntryState::Running,
        ..stopped(id, start, 0)
    }
}
