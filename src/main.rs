use anyhow::Context;
use chrono::{Duration, Utc};
use time_tracking::modules::time_entries::use_cases::log_time_entries::view::LogTimeEntriesView;
use time_tracking::modules::time_entries::use_cases::start_time_entry::command::StartTimeEntry;
use time_tracking::modules::time_entries::use_cases::stop_time_entry::command::StopTimeEntry;
use time_tracking::shell::bootstrap;
use time_tracking::shell::config::AppConfig;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const DEMO_STORAGE: &str = r#"{
    "user": { "id": 1, "name": "Demo", "email": "demo@example.com", "default_wid": 10 },
    "workspaces": [{ "id": 10, "name": "Personal" }],
    "projects": [{ "id": 20, "wid": 10, "name": "Side project", "color": 5 }]
}"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env().context("reading configuration")?;
    let storage = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?,
        None => DEMO_STORAGE.to_string(),
    };

    let (app, outcome) = bootstrap(config, storage, &|fraction| {
        debug!(fraction, "migration progress")
    })
    .await?;
    info!(?outcome, "storage ready");

    let view = LogTimeEntriesView::new(app.store.clone());
    let started = Utc::now();
    app.start_handler
        .handle(StartTimeEntry {
            draft: None,
            at: started,
        })
        .await?;
    app.stop_handler
        .handle(StopTimeEntry {
            at: started + Duration::minutes(25),
        })
        .await?;

    for row in view.rows() {
        info!(?row, "log row");
    }
    info!(load_info = ?view.load_info(), running = view.is_running(), "log ready");
    Ok(())
}
