use crate::application::errors::ApplicationError;
use crate::application::store::Store;
use crate::modules::time_entries::core::ports::DataStore;
use crate::modules::time_entries::use_cases::decision::commit;
use crate::modules::time_entries::use_cases::stop_time_entry::command::StopTimeEntry;
use crate::modules::time_entries::use_cases::stop_time_entry::decide::decide_stop;
use std::sync::Arc;

pub struct StopTimeEntryHandler<TDataStore>
where
    TDataStore: DataStore + 'static,
{
    data_store: Arc<TDataStore>,
    store: Arc<Store>,
}

impl<TDataStore> StopTimeEntryHandler<TDataStore>
where
    TDataStore: DataStore + 'static,
{
    pub fn new(data_store: Arc<TDataStore>, store: Arc<Store>) -> Self {
        Self { data_store, store }
    }

    pub async fn handle(&self, command: StopTimeEntry) -> Result<(), ApplicationError> {
        let decision = decide_stop(&self.store.state(), command);
        commit(decision, &*self.data_store, &self.store).await
    }
}
