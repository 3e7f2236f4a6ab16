//! Remote API contract used for revalidation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::project::ProjectEntity;
use crate::workspace::WorkspaceEntity;

/// Entry of a workspace's project list. Only the id is relied upon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ProjectRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// Read access to the platform's project and workspace endpoints.
///
/// Implementations return an error for transport failures and for responses
/// the API itself marks as unsuccessful.
#[async_trait]
pub trait ProjectApi: Send + Sync {
    /// Fetches workspace details.
    async fn get_workspace_by_id(&self, workspace_id: &str) -> Result<WorkspaceEntity>;

    /// Fetches the projects currently belonging to a workspace.
    async fn get_workspace_projects(&self, workspace_id: &str) -> Result<Vec<ProjectRef>>;

    /// Fetches project details.
    async fn get_project_by_id(&self, project_id: &str) -> Result<ProjectEntity>;
}
