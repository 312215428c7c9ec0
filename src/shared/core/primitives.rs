// Identifiers and time helpers shared by every module.
//
// Notes
// - Identifiers are plain strings so that legacy and remote ids can be carried untouched.
// - All instants are UTC. Calendar dates are derived with an explicit offset, never the host zone.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

pub type EntityId = String;

/// Time-ordered identifier for records created on this device.
pub fn new_entity_id() -> EntityId {
    uuid::Uuid::now_v7().to_string()
}

/// Offset of zero used when no user preference is known.
pub fn utc_offset() -> FixedOffset {
    Utc.fix()
}

pub fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}
