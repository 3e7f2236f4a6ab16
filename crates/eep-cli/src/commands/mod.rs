pub mod clear;
pub mod refresh;
pub mod select;
pub mod status;
pub mod watch;

use anyhow::{Context, Result};
use eep_application::{ActiveProjectStore, Notifier, TracingNotificationSink};
use eep_core::clock::SystemClock;
use eep_infrastructure::{ConfigService, EepPaths, FileSnapshotSlot, HttpProjectApi, SnapshotStorage};
use std::path::PathBuf;
use std::sync::Arc;

/// Services shared by every command.
pub struct AppContext {
    pub store: Arc<ActiveProjectStore>,
    pub storage: Arc<SnapshotStorage>,
    pub api: Arc<HttpProjectApi>,
}

impl AppContext {
    /// Loads configuration and hydrates the store from the snapshot file.
    pub async fn load(config_dir: Option<PathBuf>) -> Result<Self> {
        let paths = EepPaths::new(config_dir);
        let config = ConfigService::new(&paths)?
            .load()
            .context("Failed to load config.toml")?;

        let snapshot_file = paths.snapshot_file()?;
        tracing::debug!("[eep] Snapshot file: {}", snapshot_file.display());

        let clock = Arc::new(SystemClock);
        let storage = Arc::new(SnapshotStorage::new(
            Arc::new(FileSnapshotSlot::new(snapshot_file)),
            clock.clone(),
        ));
        let api = Arc::new(HttpProjectApi::new(&config.api).context("Failed to build API client")?);
        let notifier = Notifier::new(Arc::new(TracingNotificationSink), true);

        let store = ActiveProjectStore::initialize(
            config.active_project,
            storage.clone(),
            api.clone(),
            notifier,
            clock,
        )
        .await;

        Ok(Self {
            store,
            storage,
            api,
        })
    }
}
