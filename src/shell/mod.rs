// Composition root for the time_entries bounded context.
//
// Responsibilities
// - Build the store from configuration.
// - Instantiate the storage adapters and wire them into the use case handlers.
// - Run the startup migration, retrying once before discarding storage.

pub mod config;

use crate::application::errors::ApplicationError;
use crate::application::store::Store;
use crate::modules::time_entries::adapters::outbound::in_memory_data_store::InMemoryDataStore;
use crate::modules::time_entries::adapters::outbound::legacy_migrator::{
    LegacyStorageMigrator, SCHEMA_VERSION,
};
use crate::modules::time_entries::core::state::AppState;
use crate::modules::time_entries::use_cases::continue_time_entry::handler::ContinueTimeEntryHandler;
use crate::modules::time_entries::use_cases::migrate_storage::command::{
    MigrateStorage, MigrationOutcome,
};
use crate::modules::time_entries::use_cases::migrate_storage::handler::MigrateStorageHandler;
use crate::modules::time_entries::use_cases::remove_time_entry::handler::RemoveTimeEntryHandler;
use crate::modules::time_entries::use_cases::start_time_entry::handler::StartTimeEntryHandler;
use crate::modules::time_entries::use_cases::stop_time_entry::handler::StopTimeEntryHandler;
use crate::shell::config::AppConfig;
use std::sync::Arc;
use tracing::info;

pub struct App {
    pub config: AppConfig,
    pub store: Arc<Store>,
    pub data_store: Arc<InMemoryDataStore>,
    pub start_handler: StartTimeEntryHandler<InMemoryDataStore>,
    pub stop_handler: StopTimeEntryHandler<InMemoryDataStore>,
    pub continue_handler: ContinueTimeEntryHandler<InMemoryDataStore>,
    pub remove_handler: RemoveTimeEntryHandler<InMemoryDataStore>,
}

/// Wires the app around `legacy_dump`, the contents of storage written at
/// `config.schema_version`.
pub async fn bootstrap(
    config: AppConfig,
    legacy_dump: impl Into<String>,
    progress: &(dyn Fn(f32) + Send + Sync),
) -> Result<(App, MigrationOutcome), ApplicationError> {
    let store = Arc::new(Store::new(
        config.store_config(),
        AppState::with_settings(config.settings()),
    ));
    let data_store = Arc::new(InMemoryDataStore::new());
    let migrator = Arc::new(LegacyStorageMigrator::new(legacy_dump, data_store.clone()));
    let migration = MigrateStorageHandler::new(migrator, data_store.clone(), store.clone());

    let command = MigrateStorage {
        from: config.schema_version,
        to: SCHEMA_VERSION,
    };
    let mut outcome = migration.handle(command, progress).await?;
    if outcome == MigrationOutcome::Failed {
        outcome = migration.handle(command, progress).await?;
    }
    info!(?outcome, "bootstrap finished");

    let app = App {
        config,
        start_handler: StartTimeEntryHandler::new(data_store.clone(), store.clone()),
        stop_handler: StopTimeEntryHandler::new(data_store.clone(), store.clone()),
        continue_handler: ContinueTimeEntryHandler::new(data_store.clone(), store.clone()),
        remove_handler: RemoveTimeEntryHandler::new(data_store.clone(), store.clone()),
        store,
        data_store,
    };
    Ok((app, outcome))
}
