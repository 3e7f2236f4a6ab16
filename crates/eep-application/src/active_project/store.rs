use chrono::Duration;
use eep_core::api::ProjectApi;
use eep_core::clock::Clock;
use eep_core::config::ActiveProjectConfig;
use eep_core::error::EepError;
use eep_core::project::{ActiveProject, ProjectStatus, ProjectUpdate};
use eep_core::snapshot::{ActiveSelection, SnapshotRepository};
use eep_core::transform::{ProjectShape, WorkspaceShape, normalize_project, normalize_workspace};
use eep_core::workspace::{ActiveWorkspace, WorkspaceUpdate};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use tokio::sync::RwLock;

use super::views::{ProjectAlert, ProjectNavigation, SessionTimer, StatusSummary, project_alerts};
use crate::notifier::Notifier;
use crate::revalidation::{RevalidationClient, RevalidationOutcome};

/// Why a refresh dropped the active project.
#[derive(Debug, Clone, PartialEq)]
pub enum ClearReason {
    /// The workspace no longer lists the project.
    ProjectRemoved,
    /// A remote request failed.
    Failed(EepError),
}

/// Result of [`ActiveProjectStore::refresh`].
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// The active pair was replaced with fresh records.
    Refreshed(ActiveSelection),
    /// The active pair was invalid and has been cleared.
    Cleared(ClearReason),
    /// The selection changed while the refresh was in flight; result dropped.
    Stale,
    /// Another refresh is already running.
    InFlight,
    /// Nothing is active.
    NoActiveProject,
}

#[derive(Debug, Default)]
struct StoreState {
    selection: Option<ActiveSelection>,
    /// Bumped whenever the selection is replaced or dropped.
    generation: u64,
}

/// Time-independent projections, memoized until the next mutation.
#[derive(Debug)]
struct DerivedViews {
    summary: StatusSummary,
    navigation: ProjectNavigation,
}

/// Counts a unit of pending work for as long as it lives.
struct PendingWork<'a>(&'a AtomicUsize);

impl<'a> PendingWork<'a> {
    fn begin(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingWork<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Releases the in-flight refresh flag on drop.
struct RefreshFlag<'a>(&'a AtomicBool);

impl<'a> RefreshFlag<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RefreshFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Owner of the active project and workspace.
///
/// `ActiveProjectStore` is responsible for:
/// - Restoring the selection from the persisted snapshot on startup
/// - Selecting, updating and clearing the active pair
/// - Mirroring every change to the snapshot when persistence is enabled
/// - Revalidating the pair against the platform API
/// - Dropping the pair once its snapshot expires
///
/// Construct once and share through an `Arc`. No method returns an error;
/// failures surface as notifications and log events.
pub struct ActiveProjectStore {
    config: ActiveProjectConfig,
    state: RwLock<StoreState>,
    repository: Arc<dyn SnapshotRepository>,
    revalidation: RevalidationClient,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
    pending: AtomicUsize,
    refreshing: AtomicBool,
    derived: Mutex<Option<Arc<DerivedViews>>>,
    session: OnceLock<SessionTimer>,
}

impl ActiveProjectStore {
    /// Creates an empty store.
    ///
    /// `notifier` is replaced by a disabled one when the config turns
    /// notifications off.
    pub fn new(
        config: ActiveProjectConfig,
        repository: Arc<dyn SnapshotRepository>,
        api: Arc<dyn ProjectApi>,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let notifier = if config.enable_notifications {
            notifier
        } else {
            Notifier::disabled()
        };
        Self {
            config,
            state: RwLock::new(StoreState::default()),
            repository,
            revalidation: RevalidationClient::new(api, notifier.clone()),
            notifier,
            clock,
            pending: AtomicUsize::new(0),
            refreshing: AtomicBool::new(false),
            derived: Mutex::new(None),
            session: OnceLock::new(),
        }
    }

    /// Creates a store and hydrates it from the persisted snapshot.
    pub async fn initialize(
        config: ActiveProjectConfig,
        repository: Arc<dyn SnapshotRepository>,
        api: Arc<dyn ProjectApi>,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        let store = Arc::new(Self::new(config, repository, api, notifier, clock));
        store.hydrate().await;
        store
    }

    pub fn config(&self) -> &ActiveProjectConfig {
        &self.config
    }

    /// Restores the selection from the persisted snapshot without a remote
    /// round-trip. Returns the restored pair, if any.
    pub async fn hydrate(&self) -> Option<ActiveSelection> {
        if !self.config.enable_persistence {
            return None;
        }
        let _pending = PendingWork::begin(&self.pending);

        let mut state = self.state.write().await;
        let restored = self.repository.load().await;
        match &restored {
            Some(selection) => tracing::info!(
                "[ActiveProjectStore] Restored project {} in workspace {}",
                selection.project.id,
                selection.workspace.id
            ),
            None => tracing::debug!("[ActiveProjectStore] No snapshot to restore"),
        }
        state.selection = restored.clone();
        state.generation += 1;
        self.invalidate_views();
        restored
    }

    /// Makes `project` in `workspace` the active pair, replacing any previous
    /// one, and persists it.
    pub async fn set_active(
        &self,
        project: impl Into<ProjectShape>,
        workspace: impl Into<WorkspaceShape>,
    ) -> ActiveSelection {
        let selection = ActiveSelection::new(normalize_project(project), normalize_workspace(workspace));
        let _pending = PendingWork::begin(&self.pending);

        {
            let mut state = self.state.write().await;
            if self.config.enable_persistence
                && !self
                    .repository
                    .save(
                        &selection.project,
                        &selection.workspace,
                        self.config.auto_expire_hours,
                    )
                    .await
            {
                tracing::warn!(
                    "[ActiveProjectStore] Project {} is active but could not be persisted",
                    selection.project.id
                );
            }
            state.selection = Some(selection.clone());
            state.generation += 1;
            self.invalidate_views();
        }

        tracing::info!(
            "[ActiveProjectStore] Activated project {} in workspace {}",
            selection.project.id,
            selection.workspace.id
        );
        self.notifier.success(
            "Project activated",
            format!(
                "\"{}\" in \"{}\" is now your active project",
                selection.project.name, selection.workspace.name
            ),
        );
        selection
    }

    /// Merges `update` into the active project. Returns `false` when nothing
    /// is active.
    pub async fn update_project(&self, update: &ProjectUpdate) -> bool {
        let _pending = PendingWork::begin(&self.pending);
        let mut state = self.state.write().await;
        let Some(selection) = state.selection.as_mut() else {
            tracing::debug!("[ActiveProjectStore] Ignoring project update, nothing is active");
            return false;
        };

        selection.project.apply(update);
        if self.config.enable_persistence && !self.repository.update_project(update).await {
            tracing::warn!("[ActiveProjectStore] Project update was not persisted");
        }
        self.invalidate_views();
        true
    }

    /// Merges `update` into the active workspace. Returns `false` when
    /// nothing is active.
    pub async fn update_workspace(&self, update: &WorkspaceUpdate) -> bool {
        let _pending = PendingWork::begin(&self.pending);
        let mut state = self.state.write().await;
        let Some(selection) = state.selection.as_mut() else {
            tracing::debug!("[ActiveProjectStore] Ignoring workspace update, nothing is active");
            return false;
        };

        selection.workspace.apply(update);
        if self.config.enable_persistence && !self.repository.update_workspace(update).await {
            tracing::warn!("[ActiveProjectStore] Workspace update was not persisted");
        }
        self.invalidate_views();
        true
    }

    /// Sets the active project's progress (clamped into `[0, 100]`).
    pub async fn update_progress(&self, progress: i64) -> bool {
        self.update_project(&ProjectUpdate::progress(progress)).await
    }

    pub async fn update_status(&self, status: ProjectStatus) -> bool {
        self.update_project(&ProjectUpdate::status(status)).await
    }

    /// Drops the active pair and erases the snapshot.
    ///
    /// Returns the pair that was active. Clearing an empty store still erases
    /// the slot but emits no notification.
    pub async fn clear(&self) -> Option<ActiveSelection> {
        let _pending = PendingWork::begin(&self.pending);
        let cleared = {
            let mut state = self.state.write().await;
            self.clear_locked(&mut state).await
        };

        if let Some(selection) = &cleared {
            tracing::info!(
                "[ActiveProjectStore] Cleared project {}",
                selection.project.id
            );
            self.notifier.info(
                "Project cleared",
                format!("\"{}\" is no longer your active project", selection.project.name),
            );
        }
        cleared
    }

    /// Revalidates the active pair against the platform API.
    ///
    /// A valid pair is replaced with fresh records and re-persisted; a
    /// removed project or a failed round clears the store. Only one refresh
    /// runs at a time, and a result that arrives after the selection changed
    /// is dropped.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(_flag) = RefreshFlag::acquire(&self.refreshing) else {
            tracing::debug!("[ActiveProjectStore] Refresh already in flight");
            return RefreshOutcome::InFlight;
        };

        let (selection, generation) = {
            let state = self.state.read().await;
            match &state.selection {
                Some(selection) => (selection.clone(), state.generation),
                None => return RefreshOutcome::NoActiveProject,
            }
        };

        let _pending = PendingWork::begin(&self.pending);
        let outcome = self
            .revalidation
            .refresh(&selection.project, &selection.workspace)
            .await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::debug!(
                "[ActiveProjectStore] Discarding refresh of project {}, selection changed",
                selection.project.id
            );
            return RefreshOutcome::Stale;
        }

        match outcome {
            RevalidationOutcome::Valid(fresh) => {
                if self.config.enable_persistence
                    && !self
                        .repository
                        .save(&fresh.project, &fresh.workspace, self.config.auto_expire_hours)
                        .await
                {
                    tracing::warn!("[ActiveProjectStore] Refreshed project was not persisted");
                }
                state.selection = Some(fresh.clone());
                self.invalidate_views();
                RefreshOutcome::Refreshed(fresh)
            }
            RevalidationOutcome::ProjectRemoved => {
                self.clear_locked(&mut state).await;
                RefreshOutcome::Cleared(ClearReason::ProjectRemoved)
            }
            RevalidationOutcome::Failed(e) => {
                self.clear_locked(&mut state).await;
                RefreshOutcome::Cleared(ClearReason::Failed(e))
            }
        }
    }

    /// Clears the store if the persisted snapshot has expired.
    ///
    /// Returns `true` when a pair was dropped. Does nothing when persistence
    /// is disabled.
    pub async fn sweep_expired(&self) -> bool {
        if !self.config.enable_persistence {
            return false;
        }

        let cleared = {
            let mut state = self.state.write().await;
            if state.selection.is_none() || !self.repository.is_expired().await {
                return false;
            }
            self.clear_locked(&mut state).await
        };

        match cleared {
            Some(selection) => {
                tracing::info!(
                    "[ActiveProjectStore] Snapshot of project {} expired",
                    selection.project.id
                );
                self.notifier.warning(
                    "Project expired",
                    format!(
                        "\"{}\" was inactive for too long and has been cleared",
                        selection.project.name
                    ),
                );
                true
            }
            None => false,
        }
    }

    async fn clear_locked(&self, state: &mut StoreState) -> Option<ActiveSelection> {
        let cleared = state.selection.take();
        state.generation += 1;
        if self.config.enable_persistence && !self.repository.clear().await {
            tracing::warn!("[ActiveProjectStore] Snapshot could not be erased");
        }
        self.invalidate_views();
        cleared
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub async fn current(&self) -> Option<ActiveSelection> {
        self.state.read().await.selection.clone()
    }

    pub async fn active_project(&self) -> Option<ActiveProject> {
        self.state
            .read()
            .await
            .selection
            .as_ref()
            .map(|s| s.project.clone())
    }

    pub async fn active_workspace(&self) -> Option<ActiveWorkspace> {
        self.state
            .read()
            .await
            .selection
            .as_ref()
            .map(|s| s.workspace.clone())
    }

    pub async fn active_project_id(&self) -> Option<String> {
        self.state
            .read()
            .await
            .selection
            .as_ref()
            .map(|s| s.project.id.clone())
    }

    pub async fn active_workspace_id(&self) -> Option<String> {
        self.state
            .read()
            .await
            .selection
            .as_ref()
            .map(|s| s.workspace.id.clone())
    }

    pub async fn is_active_project(&self, project_id: &str) -> bool {
        self.state
            .read()
            .await
            .selection
            .as_ref()
            .is_some_and(|s| s.project.id == project_id)
    }

    pub async fn is_active_workspace(&self, workspace_id: &str) -> bool {
        self.state
            .read()
            .await
            .selection
            .as_ref()
            .is_some_and(|s| s.workspace.id == workspace_id)
    }

    pub async fn has_active(&self) -> bool {
        self.state.read().await.selection.is_some()
    }

    pub async fn status_summary(&self) -> Option<StatusSummary> {
        self.derived_views().await.map(|views| views.summary.clone())
    }

    pub async fn navigation(&self) -> Option<ProjectNavigation> {
        self.derived_views().await.map(|views| views.navigation.clone())
    }

    /// Deadline and progress alerts for the active project at the current time.
    pub async fn alerts(&self) -> Vec<ProjectAlert> {
        let now = self.clock.now();
        self.state
            .read()
            .await
            .selection
            .as_ref()
            .map(|s| project_alerts(&s.project, now))
            .unwrap_or_default()
    }

    /// Emits every current alert as a notification. Returns how many applied.
    pub async fn emit_alerts(&self) -> usize {
        let alerts = self.alerts().await;
        for alert in &alerts {
            self.notifier.notify(alert.to_notification());
        }
        alerts.len()
    }

    /// Session timer, started on first access.
    pub fn session_timer(&self) -> SessionTimer {
        *self
            .session
            .get_or_init(|| SessionTimer::start(self.clock.now()))
    }

    /// Time since the session timer was first read.
    pub fn session_elapsed(&self) -> Duration {
        self.session_timer().elapsed(self.clock.now())
    }

    /// True while persistence work or a remote revalidation is pending.
    pub fn is_loading(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::SeqCst)
    }

    /// Counter bumped by every selection change.
    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    async fn derived_views(&self) -> Option<Arc<DerivedViews>> {
        let state = self.state.read().await;
        let selection = state.selection.as_ref()?;

        let mut derived = self.derived.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(views) = derived.as_ref() {
            return Some(views.clone());
        }
        let views = Arc::new(DerivedViews {
            summary: StatusSummary::from_project(&selection.project),
            navigation: ProjectNavigation::new(&selection.project, &selection.workspace),
        });
        *derived = Some(views.clone());
        Some(views)
    }

    fn invalidate_views(&self) {
        *self.derived.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}
