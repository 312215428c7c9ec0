use crate::modules::time_entries::core::messages::Message;
use crate::modules::time_entries::core::ports::StoredRecord;
use crate::modules::time_entries::core::record::SyncState;
use crate::modules::time_entries::core::state::AppState;
use crate::modules::time_entries::use_cases::decision::{DecideError, Decision};
use crate::modules::time_entries::use_cases::remove_time_entry::command::RemoveTimeEntry;

/// Storage keeps a tombstone for the next sync; the state forgets the entry at once.
pub fn decide_remove(state: &AppState, command: RemoveTimeEntry) -> Decision {
    let Some(record) = state.time_entries.get(&command.id) else {
        return Decision::rejected(DecideError::UnknownTimeEntry(command.id));
    };
    let mut tombstone = record.clone();
    tombstone.sync_state = SyncState::PendingDelete;
    Decision::Accepted {
        persist: vec![StoredRecord::TimeEntry(tombstone)],
        messages: vec![Message::TimeEntryRemoved { id: command.id }],
    }
}
