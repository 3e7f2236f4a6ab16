//! In-memory implementation of [`ProjectApi`].
//!
//! Serves fixtures instead of talking to the platform. Requests can be made
//! to fail or held until released, which lets callers exercise failure and
//! interleaving paths deterministically.

use async_trait::async_trait;
use eep_core::api::{ProjectApi, ProjectRef};
use eep_core::error::{EepError, Result};
use eep_core::project::{ProjectBasics, ProjectEntity, ProjectStatus};
use eep_core::workspace::{WorkspaceBasics, WorkspaceEntity};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, watch};

#[derive(Default)]
struct Fixtures {
    workspaces: HashMap<String, WorkspaceEntity>,
    projects: HashMap<String, ProjectEntity>,
    failure: Option<EepError>,
}

/// Fixture-backed [`ProjectApi`]. Clones share fixtures.
#[derive(Clone)]
pub struct InMemoryProjectApi {
    fixtures: Arc<Mutex<Fixtures>>,
    paused: Arc<watch::Sender<bool>>,
    calls: Arc<AtomicUsize>,
}

impl Default for InMemoryProjectApi {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryProjectApi {
    pub fn new() -> Self {
        let (paused, _) = watch::channel(false);
        Self {
            fixtures: Arc::new(Mutex::new(Fixtures::default())),
            paused: Arc::new(paused),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Stores a workspace entity.
    pub async fn insert_workspace(&self, workspace: WorkspaceEntity) {
        let mut fixtures = self.fixtures.lock().await;
        fixtures
            .workspaces
            .insert(workspace.basics.id.clone(), workspace);
    }

    /// Stores a project entity.
    pub async fn insert_project(&self, project: ProjectEntity) {
        let mut fixtures = self.fixtures.lock().await;
        fixtures.projects.insert(project.basics.id.clone(), project);
    }

    /// Shorthand for a workspace listing `project_ids`.
    pub async fn put_workspace(&self, id: &str, name: &str, project_ids: &[&str]) {
        self.insert_workspace(WorkspaceEntity {
            basics: WorkspaceBasics::new(id, name),
            project_ids: project_ids.iter().map(|p| p.to_string()).collect(),
        })
        .await;
    }

    /// Shorthand for an active project with the given progress.
    pub async fn put_project(&self, id: &str, name: &str, progress: i64) {
        let mut basics = ProjectBasics::new(id, name);
        basics.status = ProjectStatus::Active;
        basics.progress = Some(progress);
        self.insert_project(ProjectEntity {
            basics,
            member_ids: Vec::new(),
            workspace_id: None,
            last_activity_at: None,
            category: None,
        })
        .await;
    }

    /// Removes a project from a workspace's listing.
    pub async fn detach_project(&self, workspace_id: &str, project_id: &str) {
        let mut fixtures = self.fixtures.lock().await;
        if let Some(workspace) = fixtures.workspaces.get_mut(workspace_id) {
            workspace.project_ids.retain(|id| id != project_id);
        }
    }

    /// Makes every request fail with `error` until [`Self::clear_failure`].
    pub async fn fail_with(&self, error: EepError) {
        self.fixtures.lock().await.failure = Some(error);
    }

    pub async fn clear_failure(&self) {
        self.fixtures.lock().await.failure = None;
    }

    /// Holds requests until [`Self::resume`] is called.
    pub fn pause(&self) {
        self.paused.send_replace(true);
    }

    /// Releases held requests.
    pub fn resume(&self) {
        self.paused.send_replace(false);
    }

    /// Number of requests received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn begin(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut paused = self.paused.subscribe();
        loop {
            let is_paused = *paused.borrow_and_update();
            if !is_paused {
                break;
            }
            paused
                .changed()
                .await
                .map_err(|e| EepError::internal(format!("pause gate closed: {}", e)))?;
        }
        match &self.fixtures.lock().await.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProjectApi for InMemoryProjectApi {
    async fn get_workspace_by_id(&self, workspace_id: &str) -> Result<WorkspaceEntity> {
        self.begin().await?;
        self.fixtures
            .lock()
            .await
            .workspaces
            .get(workspace_id)
            .cloned()
            .ok_or_else(|| EepError::not_found("workspace", workspace_id))
    }

    async fn get_workspace_projects(&self, workspace_id: &str) -> Result<Vec<ProjectRef>> {
        self.begin().await?;
        let fixtures = self.fixtures.lock().await;
        let workspace = fixtures
            .workspaces
            .get(workspace_id)
            .ok_or_else(|| EepError::not_found("workspace", workspace_id))?;
        Ok(workspace
            .project_ids
            .iter()
            .map(|id| ProjectRef {
                id: id.clone(),
                name: fixtures.projects.get(id).map(|p| p.basics.name.clone()),
            })
            .collect())
    }

    async fn get_project_by_id(&self, project_id: &str) -> Result<ProjectEntity> {
        self.begin().await?;
        self.fixtures
            .lock()
            .await
            .projects
            .get(project_id)
            .cloned()
            .ok_or_else(|| EepError::not_found("project", project_id))
    }
}
