use std::sync::{Arc, Mutex};
use time_tracking::modules::time_entries::core::ports::{DataStore, RecordKind};
use time_tracking::modules::time_entries::use_cases::migrate_storage::command::MigrationOutcome;
use time_tracking::modules::time_entries::use_cases::start_time_entry::command::StartTimeEntry;
use time_tracking::shell::bootstrap;
use time_tracking::shell::config::AppConfig;

const LEGACY: &str = r#"{
    "user": { "id": 1, "name": "Ada", "email": "ada@example.com", "default_wid": 10 },
    "workspaces": [{ "id": 10, "name": "Personal" }],
    "time_entries": [
        { "id": 100, "wid": 10, "start": "2024-01-01T09:00:00Z", "duration": 600 },
        { "id": 101, "wid": 10, "start": "2024-01-01T08:00:00Z", "duration": 300, "deleted": true }
    ]
}"#;

fn progress_log() -> (Arc<Mutex<Vec<f32>>>, impl Fn(f32) + Send + Sync) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    (log, move |fraction| sink.lock().unwrap().push(fraction))
}

#[tokio::test]
async fn it_should_boot_from_legacy_storage() {
    let (log, progress) = progress_log();
    let (app, outcome) = bootstrap(AppConfig::default(), LEGACY, &progress)
        .await
        .expect("bootstrap failed");

    assert_eq!(outcome, MigrationOutcome::Migrated);
    assert_eq!(log.lock().unwrap().last(), Some(&1.0));

    let state = app.store.state();
    assert!(state.is_authenticated());
    assert_eq!(state.time_entries.live().count(), 1);
    assert_eq!(app.store.rows().len(), 2);

    app.start_handler
        .handle(StartTimeEntry {
            draft: None,
            at: chrono::DateTime::parse_from_rfc3339("2024-01-02T09:00:00Z")
                .unwrap()
                .with_timezone(&chrono::Utc),
        })
        .await
        .expect("start failed");
    let running = app.store.state().running_entry().cloned().expect("running entry");
    assert_eq!(running.workspace_id, "10");
}

#[tokio::test]
async fn it_should_discard_corrupted_storage_after_a_retry() {
    let (log, progress) = progress_log();
    let (app, outcome) = bootstrap(AppConfig::default(), "{ corrupted", &progress)
        .await
        .expect("bootstrap failed");

    assert_eq!(outcome, MigrationOutcome::Discarded);
    assert!(!log.lock().unwrap().contains(&1.0));
    assert!(!app.store.state().is_authenticated());
    assert!(
        app.data_store
            .load_all(RecordKind::TimeEntry)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn it_should_skip_migration_when_storage_is_current() {
    let config = AppConfig {
        schema_version: 1,
        ..AppConfig::default()
    };
    let (log, progress) = progress_log();
    let (app, outcome) = bootstrap(config, "", &progress).await.unwrap();
    assert_eq!(outcome, MigrationOutcome::Migrated);
    assert_eq!(*log.lock().unwrap(), vec![1.0]);
    assert!(app.store.state().time_entries.records.is_empty());
}
