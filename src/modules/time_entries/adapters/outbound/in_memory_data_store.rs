// In memory implementation of the DataStore port.
//
// Purpose
// - Support use case tests and local development without an on-device database.
//
// Responsibilities
// - Keep records per (kind, id); persisting an existing pair replaces it.
// - Fail every call with a backend error while offline.

use crate::modules::time_entries::core::ports::{DataStore, DataStoreError, RecordKind, StoredRecord};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryDataStore {
    records: RwLock<BTreeMap<(RecordKind, String), StoredRecord>>,
    offline: AtomicBool,
}

impl InMemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&self) {
        self.offline.fetch_xor(true, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), DataStoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DataStoreError::Backend("Data store offline".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DataStore for InMemoryDataStore {
    async fn load_all(&self, kind: RecordKind) -> Result<Vec<StoredRecord>, DataStoreError> {
        self.ensure_online()?;
        let guard = self.records.read().await;
        Ok(guard
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn persist(&self, record: StoredRecord) -> Result<(), DataStoreError> {
        self.ensure_online()?;
        let key = (record.kind(), record.id().to_string());
        self.records.write().await.insert(key, record);
        Ok(())
    }

    async fn remove(&self, kind: RecordKind, id: &str) -> Result<(), DataStoreError> {
        self.ensure_online()?;
        self.records.write().await.remove(&(kind, id.to_string()));
        Ok(())
    }

    async fn clear(&self) -> Result<(), DataStoreError> {
        self.ensure_online()?;
        self.records.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod in_memory_data_store_tests {
    use super::*;
    use crate::tests::fixtures::records::{TimeEntryRecordBuilder, user};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn it_should_persist_and_load_by_kind() {
        let store = InMemoryDataStore::new();
        store
            .persist(StoredRecord::TimeEntry(
                TimeEntryRecordBuilder::new().id("te-1").build(),
            ))
            .await
            .expect("persist failed");
        store
            .persist(StoredRecord::User(user()))
            .await
            .expect("persist failed");

        let entries = store.load_all(RecordKind::TimeEntry).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id(), "te-1");
        assert_eq!(store.load_all(RecordKind::User).await.unwrap().len(), 1);
        assert!(store.load_all(RecordKind::Project).await.unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_replace_a_record_with_the_same_id() {
        let store = InMemoryDataStore::new();
        for description in ["first", "second"] {
            store
                .persist(StoredRecord::TimeEntry(
                    TimeEntryRecordBuilder::new()
                        .id("te-1")
                        .description(description)
                        .build(),
                ))
                .await
                .unwrap();
        }
        let entries = store.load_all(RecordKind::TimeEntry).await.unwrap();
        assert!(matches!(
            entries.as_slice(),
            [StoredRecord::TimeEntry(record)] if record.description == "second"
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_remove_and_clear() {
        let store = InMemoryDataStore::new();
        store
            .persist(StoredRecord::TimeEntry(
                TimeEntryRecordBuilder::new().id("te-1").build(),
            ))
            .await
            .unwrap();
        store.persist(StoredRecord::User(user())).await.unwrap();

        store.remove(RecordKind::TimeEntry, "te-1").await.unwrap();
        assert!(store.load_all(RecordKind::TimeEntry).await.unwrap().is_empty());

        store.clear().await.unwrap();
        assert!(store.load_all(RecordKind::User).await.unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_while_offline() {
        let store = InMemoryDataStore::new();
        store.toggle_offline();
        let result = store.load_all(RecordKind::TimeEntry).await;
        assert_eq!(
            result,
            Err(DataStoreError::Backend("Data store offline".into()))
        );
        store.toggle_offline();
        assert!(store.load_all(RecordKind::TimeEntry).await.is_ok());
    }
}
