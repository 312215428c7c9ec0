use crate::application::errors::ApplicationError;
use crate::application::store::Store;
use crate::modules::time_entries::core::ports::DataStore;
use crate::modules::time_entries::use_cases::continue_time_entry::command::ContinueTimeEntry;
use crate::modules::time_entries::use_cases::continue_time_entry::decide::decide_continue;
use crate::modules::time_entries::use_cases::decision::commit;
use std::sync::Arc;

pub struct ContinueTimeEntryHandler<TDataStore>
where
    TDataStore: DataStore + 'static,
{
    data_store: Arc<TDataStore>,
    store: Arc<Store>,
}

impl<TDataStore> ContinueTimeEntryHandler<TDataStore>
where
    TDataStore: DataStore + 'static,
{
    pub fn new(data_store: Arc<TDataStore>, store: Arc<Store>) -> Self {
        Self { data_store, store }
    }

    pub async fn handle(&self, command: ContinueTimeEntry) -> Result<(), ApplicationError> {
        let decision = decide_continue(&self.store.state(), command);
        commit(decision, &*self.data_store, &self.store).await
    }
}

#[cfg(test)]
mod time_entry_continue_handler_tests {
    use super::*;
    use crate::application::store::StoreConfig;
    use crate::modules::time_entries::adapters::outbound::in_memory_data_store::InMemoryDataStore;
    use crate::modules::time_entries::core::messages::Message;
    use crate::modules::time_entries::core::ports::RecordKind;
    use crate::modules::time_entries::core::state::AppState;
    use crate::tests::fixtures::records::{TimeEntryRecordBuilder, at};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn it_should_start_a_copy_next_to_the_original() {
        let store = Arc::new(Store::new(StoreConfig::default(), AppState::default()));
        store.dispatch(Message::TimeEntryPut {
            record: TimeEntryRecordBuilder::new()
                .id("te-1")
                .start(at("2024-01-01T09:00:00Z"))
                .build(),
        });
        let data_store = Arc::new(InMemoryDataStore::new());
        let handler = ContinueTimeEntryHandler::new(data_store.clone(), store.clone());
        handler
            .handle(ContinueTimeEntry {
                id: "te-1".into(),
                at: at("2024-01-02T09:00:00Z"),
            })
            .await
            .expect("handle failed");

        let state = store.state();
        assert_eq!(state.time_entries.records.len(), 2);
        let running = state.running_entry().expect("a running copy");
        assert_eq!(running.description, "This is a test");
        assert_eq!(data_store.load_all(RecordKind::TimeEntry).await.unwrap().len(), 1);
    }
}
