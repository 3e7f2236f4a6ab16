//! Revalidation client.
//!
//! Confirms against the platform API that the active project still exists and
//! still belongs to the active workspace, returning fresh canonical records.

use eep_core::api::ProjectApi;
use eep_core::error::EepError;
use eep_core::project::ActiveProject;
use eep_core::snapshot::ActiveSelection;
use eep_core::transform::{normalize_project, normalize_workspace};
use eep_core::workspace::{ActiveWorkspace, WorkspaceUpdate};
use std::sync::Arc;

use crate::notifier::Notifier;

/// Result of one revalidation round.
#[derive(Debug, Clone, PartialEq)]
pub enum RevalidationOutcome {
    /// Project is still part of the workspace; fresh normalized records.
    Valid(ActiveSelection),
    /// The workspace no longer lists the project.
    ProjectRemoved,
    /// One of the remote requests failed.
    Failed(EepError),
}

impl RevalidationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn into_selection(self) -> Option<ActiveSelection> {
        match self {
            Self::Valid(selection) => Some(selection),
            _ => None,
        }
    }
}

/// Fetches canonical project/workspace state from the platform API.
///
/// Never returns an error and never retries; the caller decides what a
/// failed round means for local state.
#[derive(Clone)]
pub struct RevalidationClient {
    api: Arc<dyn ProjectApi>,
    notifier: Notifier,
}

impl RevalidationClient {
    pub fn new(api: Arc<dyn ProjectApi>, notifier: Notifier) -> Self {
        Self { api, notifier }
    }

    /// Re-fetches workspace details, the workspace's project list and the
    /// project's details concurrently. Any failure fails the whole round.
    pub async fn refresh(
        &self,
        project: &ActiveProject,
        workspace: &ActiveWorkspace,
    ) -> RevalidationOutcome {
        tracing::debug!(
            "[Revalidation] Checking project {} in workspace {}",
            project.id,
            workspace.id
        );

        let fetched = tokio::try_join!(
            self.api.get_workspace_by_id(&workspace.id),
            self.api.get_workspace_projects(&workspace.id),
            self.api.get_project_by_id(&project.id),
        );

        let (workspace_entity, project_refs, project_entity) = match fetched {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!(
                    "[Revalidation] Failed to refresh project {}: {}",
                    project.id,
                    e
                );
                self.notifier.error(
                    "Refresh failed",
                    format!("Could not refresh \"{}\": {}", project.name, e),
                );
                return RevalidationOutcome::Failed(e);
            }
        };

        if !project_refs.iter().any(|r| r.id == project.id) {
            tracing::warn!(
                "[Revalidation] Project {} is no longer part of workspace {}",
                project.id,
                workspace.id
            );
            self.notifier.warning(
                "Project removed",
                format!(
                    "\"{}\" is no longer part of \"{}\"",
                    project.name, workspace_entity.basics.name
                ),
            );
            return RevalidationOutcome::ProjectRemoved;
        }

        let mut fresh_workspace = normalize_workspace(workspace_entity);
        // The dedicated project listing is authoritative for membership
        fresh_workspace.apply(&WorkspaceUpdate {
            project_ids: Some(project_refs.into_iter().map(|r| r.id).collect()),
            ..Default::default()
        });
        let fresh_project = normalize_project(project_entity);

        tracing::info!(
            "[Revalidation] Project {} refreshed ({} projects in workspace)",
            fresh_project.id,
            fresh_workspace.project_count
        );
        self.notifier.info(
            "Project refreshed",
            format!("\"{}\" is up to date", fresh_project.name),
        );

        RevalidationOutcome::Valid(ActiveSelection::new(fresh_project, fresh_workspace))
    }
}
