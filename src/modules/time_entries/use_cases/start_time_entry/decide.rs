use crate::modules::time_entries::core::record::TimeEntryRecord;
use crate::modules::time_entries::core::state::AppState;
use crate::modules::time_entries::use_cases::decision::{DecideError, Decision, start_after_stopping};
use crate::modules::time_entries::use_cases::start_time_entry::command::StartTimeEntry;

pub fn decide_start(state: &AppState, command: StartTimeEntry) -> Decision {
    let Some(user) = &state.user else {
        return Decision::rejected(DecideError::NotAuthenticated);
    };
    let draft = command
        .draft
        .unwrap_or_else(|| TimeEntryRecord::draft(Some(user), command.at));
    start_after_stopping(state, draft.started_at(command.at), command.at)
}
