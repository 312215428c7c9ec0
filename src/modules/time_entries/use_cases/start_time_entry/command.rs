use crate::modules::time_entries::core::record::TimeEntryRecord;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTimeEntry {
    /// Entry being edited in the start dialog; a fresh draft when absent.
    pub draft: Option<TimeEntryRecord>,
    pub at: DateTime<Utc>,
}
