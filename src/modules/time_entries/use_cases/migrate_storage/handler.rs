// Startup migration, run once before the store takes steady-state messages.
//
// Flow
// - Migrate, then rebuild the state from storage with InitStateAfterMigration.
// - The first failure is reported so the user can retry. Any later failure discards storage and
//   dispatches ResetState followed by NoUserDataPut.

use crate::application::errors::ApplicationError;
use crate::application::store::Store;
use crate::modules::time_entries::core::messages::{Message, PersistedSnapshot};
use crate::modules::time_entries::core::ports::{DataStore, DataStoreError, Migrator, RecordKind, StoredRecord};
use crate::modules::time_entries::use_cases::migrate_storage::command::{MigrateStorage, MigrationOutcome};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{info, warn};

pub struct MigrateStorageHandler<TMigrator, TDataStore>
where
    TMigrator: Migrator + 'static,
    TDataStore: DataStore + 'static,
{
    migrator: Arc<TMigrator>,
    data_store: Arc<TDataStore>,
    store: Arc<Store>,
    failures: AtomicU32,
}

impl<TMigrator, TDataStore> MigrateStorageHandler<TMigrator, TDataStore>
where
    TMigrator: Migrator + 'static,
    TDataStore: DataStore + 'static,
{
    pub fn new(migrator: Arc<TMigrator>, data_store: Arc<TDataStore>, store: Arc<Store>) -> Self {
        Self {
            migrator,
            data_store,
            store,
            failures: AtomicU32::new(0),
        }
    }

    pub async fn handle(
        &self,
        command: MigrateStorage,
        progress: &(dyn Fn(f32) + Send + Sync),
    ) -> Result<MigrationOutcome, ApplicationError> {
        if self.migrator.migrate(command.from, command.to, progress).await {
            let snapshot = load_snapshot(&*self.data_store).await?;
            info!(
                time_entries = snapshot.time_entries.len(),
                signed_in = snapshot.user.is_some(),
                "storage ready"
            );
            self.store
                .dispatch(Message::InitStateAfterMigration { snapshot });
            return Ok(MigrationOutcome::Migrated);
        }

        let failures = self.failures.fetch_add(1, Ordering::SeqCst) + 1;
        warn!(from = command.from, to = command.to, failures, "storage migration failed");
        if failures == 1 {
            return Ok(MigrationOutcome::Failed);
        }
        self.discard().await?;
        Ok(MigrationOutcome::Discarded)
    }

    /// Drops every stored record and resets the state.
    pub async fn discard(&self) -> Result<(), ApplicationError> {
        self.data_store.clear().await?;
        self.store.dispatch(Message::ResetState);
        self.store.dispatch(Message::NoUserDataPut);
        info!("storage discarded");
        Ok(())
    }
}

async fn load_snapshot<TDataStore>(data_store: &TDataStore) -> Result<PersistedSnapshot, DataStoreError>
where
    TDataStore: DataStore + ?Sized,
{
    let mut snapshot = PersistedSnapshot::default();
    for kind in [
        RecordKind::User,
        RecordKind::Workspace,
        RecordKind::Project,
        RecordKind::Client,
        RecordKind::Task,
        RecordKind::Tag,
        RecordKind::TimeEntry,
    ] {
        for record in data_store.load_all(kind).await? {
            let reference = &mut snapshot.reference;
            match record {
                StoredRecord::User(user) => snapshot.user = Some(user),
                StoredRecord::Workspace(w) => {
                    reference.workspaces.insert(w.id.clone(), w);
                }
                StoredRecord::Project(p) => {
                    reference.projects.insert(p.id.clone(), p);
                }
                StoredRecord::Client(c) => {
                    reference.clients.insert(c.id.clone(), c);
                }
                StoredRecord::Task(t) => {
                    reference.tasks.insert(t.id.clone(), t);
                }
                StoredRecord::Tag(t) => {
                    reference.tags.insert(t.id.clone(), t);
                }
                StoredRecord::TimeEntry(entry) => snapshot.time_entries.push(entry),
            }
        }
    }
    Ok(snapshot)
}
