use crate::modules::time_entries::core::state::AppState;
use crate::modules::time_entries::use_cases::continue_time_entry::command::ContinueTimeEntry;
use crate::modules::time_entries::use_cases::decision::{DecideError, Decision, start_after_stopping};

/// Resumes duration-only entries of the same day in place; copies anything else.
pub fn decide_continue(state: &AppState, command: ContinueTimeEntry) -> Decision {
    let Some(record) = state.time_entries.get(&command.id) else {
        return Decision::rejected(DecideError::UnknownTimeEntry(command.id));
    };
    if record.is_running() {
        return Decision::rejected(DecideError::AlreadyRunning(command.id));
    }
    let continued = record.continued_at(command.at, state.settings.utc_offset);
    start_after_stopping(state, continued, command.at)
}
