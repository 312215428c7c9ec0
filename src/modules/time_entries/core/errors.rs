use crate::modules::time_entries::core::messages::MessageKind;
use crate::shared::core::primitives::EntityId;
use serde::Serialize;

/// Data-model invariants a reducer refuses to break.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq, Serialize)]
pub enum InvariantViolation {
    #[error("more than one running time entry: {0:?}")]
    MultipleRunningEntries(Vec<EntityId>),

    #[error("time entry {0} has a stop time that does not match its running state")]
    StopTimeMismatch(EntityId),

    #[error("time entry {0} has a duration that does not match its running state")]
    DurationEncodingMismatch(EntityId),

    #[error("time entry {0} has no workspace")]
    MissingWorkspace(EntityId),
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq, Serialize)]
pub enum ReduceError {
    #[error(transparent)]
    InvariantViolation(#[from] InvariantViolation),

    #[error("reducer for {expected:?} received a {actual:?} message")]
    PayloadMismatch {
        expected: MessageKind,
        actual: MessageKind,
    },

    #[error("unknown time entry {0}")]
    UnknownTimeEntry(EntityId),

    #[error("sync failed: {0}")]
    SyncFailed(String),
}
