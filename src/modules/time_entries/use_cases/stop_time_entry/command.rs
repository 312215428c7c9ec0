use chrono::{DateTime, Utc};

/// Stops whichever entry is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopTimeEntry {
    pub at: DateTime<Utc>,
}
