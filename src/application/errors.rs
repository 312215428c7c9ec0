use crate::modules::time_entries::core::messages::MessageKind;
use crate::modules::time_entries::core::ports::DataStoreError;
use thiserror::Error;

/// Raised by the store before any reducer runs. Logged and ignored, never fatal.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("no reducer registered for {0:?}")]
    UnhandledMessageKind(MessageKind),
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    DataStore(#[from] DataStoreError),

    #[error("domain rejected: {0}")]
    Domain(String),

    #[error("unexpected: {0}")]
    Unexpected(String),
}
