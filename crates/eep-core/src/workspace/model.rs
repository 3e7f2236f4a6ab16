use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::transform::saturating_count;

/// Lifecycle status of a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkspaceStatus {
    Draft,
    #[default]
    Active,
    Paused,
    Completed,
    Archived,
}

impl WorkspaceStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceStatus::Draft => "draft",
            WorkspaceStatus::Active => "active",
            WorkspaceStatus::Paused => "paused",
            WorkspaceStatus::Completed => "completed",
            WorkspaceStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for WorkspaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who can see a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceVisibility {
    Public,
    #[default]
    Private,
    Organization,
}

/// Canonical snapshot of the workspace containing the active project.
///
/// Invariant: when `project_ids` is present, `project_count` equals its length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveWorkspace {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: WorkspaceStatus,
    #[serde(default)]
    pub visibility: WorkspaceVisibility,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_count: Option<u32>,
    #[serde(default)]
    pub project_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_ids: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ActiveWorkspace {
    /// Creates a record holding only an id and a name.
    pub fn minimal(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            status: WorkspaceStatus::default(),
            visibility: WorkspaceVisibility::default(),
            member_count: None,
            project_count: 0,
            project_ids: None,
            tags: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Whether the workspace lists `project_id` among its projects.
    ///
    /// Returns `None` when the full project list is unknown.
    pub fn contains_project(&self, project_id: &str) -> Option<bool> {
        self.project_ids
            .as_ref()
            .map(|ids| ids.iter().any(|id| id == project_id))
    }

    /// Re-derives `project_count` from `project_ids` when the list is known.
    pub(crate) fn sync_project_count(&mut self) {
        if let Some(ids) = &self.project_ids {
            self.project_count = saturating_count(ids.len());
        }
    }

    /// Merges the supplied fields of `update` into this record.
    ///
    /// A supplied `project_ids` list always wins over a supplied
    /// `project_count`; an explicit count is ignored while the list is known.
    pub fn apply(&mut self, update: &WorkspaceUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(visibility) = update.visibility {
            self.visibility = visibility;
        }
        if let Some(member_count) = update.member_count {
            self.member_count = Some(member_count);
        }
        if let Some(tags) = &update.tags {
            self.tags = tags.clone();
        }
        if let Some(at) = update.updated_at {
            self.updated_at = Some(at);
        }
        if let Some(ids) = &update.project_ids {
            self.project_ids = Some(ids.clone());
        } else if let Some(count) = update.project_count
            && self.project_ids.is_none()
        {
            self.project_count = count;
        }
        self.sync_project_count();
    }
}

/// Partial update for the active workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkspaceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<WorkspaceVisibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl WorkspaceUpdate {
    /// Returns true if no field is supplied.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================================================
// Source shapes
// ============================================================================

/// Fields shared by every workspace shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceBasics {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: WorkspaceStatus,
    #[serde(default)]
    pub visibility: WorkspaceVisibility,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_count: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl WorkspaceBasics {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            status: WorkspaceStatus::default(),
            visibility: WorkspaceVisibility::default(),
            member_count: None,
            tags: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// Full workspace entity as returned by `GET /workspaces/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceEntity {
    #[serde(flatten)]
    pub basics: WorkspaceBasics,
    #[serde(default)]
    pub project_ids: Vec<String>,
}

/// Lightweight workspace listing entry carrying only a project count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSummary {
    #[serde(flatten)]
    pub basics: WorkspaceBasics,
    #[serde(default)]
    pub project_count: u32,
}
