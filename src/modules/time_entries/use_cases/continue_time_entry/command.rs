use crate::shared::core::primitives::EntityId;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinueTimeEntry {
    pub id: EntityId,
    pub at: DateTime<Utc>,
}
