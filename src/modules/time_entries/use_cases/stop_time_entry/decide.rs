use crate::modules::time_entries::core::state::AppState;
use crate::modules::time_entries::use_cases::decision::{DecideError, Decision, stop_running};
use crate::modules::time_entries::use_cases::stop_time_entry::command::StopTimeEntry;

pub fn decide_stop(state: &AppState, command: StopTimeEntry) -> Decision {
    match stop_running(state, command.at) {
        Some((stopped, message)) => Decision::Accepted {
            persist: vec![stopped],
            messages: vec![message],
        },
        None => Decision::rejected(DecideError::NothingRunning),
    }
}
