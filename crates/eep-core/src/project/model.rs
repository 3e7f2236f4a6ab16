use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound for project progress, in percent.
pub const MAX_PROGRESS: u8 = 100;

/// Clamps a raw progress value into `[0, 100]`.
pub fn clamp_progress(value: i64) -> u8 {
    value.clamp(0, MAX_PROGRESS as i64) as u8
}

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    /// Created but not yet started.
    #[default]
    Draft,
    /// Learners are working on it.
    Active,
    Completed,
    Archived,
    /// Temporarily paused by a mentor or admin.
    OnHold,
}

impl ProjectStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
            ProjectStatus::OnHold => "on-hold",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who can see a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectVisibility {
    Public,
    #[default]
    Private,
    Workspace,
    Organization,
}

/// Canonical in-memory snapshot of the active project.
///
/// Every project shape the platform exchanges is normalized into this record
/// (see [`crate::transform::normalize_project`]). `progress` is always within
/// `[0, 100]` when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveProject {
    /// Stable identifier. Never changed by updates.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    /// Back-reference to the containing workspace, when the source carried it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<ProjectVisibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl ActiveProject {
    /// Creates a record holding only an id and a name.
    ///
    /// This is what a legacy snapshot without full project data restores to.
    pub fn minimal(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            status: ProjectStatus::default(),
            progress: None,
            workspace_id: None,
            member_count: None,
            last_activity_at: None,
            next_deadline: None,
            created_at: None,
            updated_at: None,
            category: None,
            technologies: Vec::new(),
            visibility: None,
            thumbnail_url: None,
        }
    }

    /// Merges the supplied fields of `update` into this record.
    ///
    /// Fields left as `None` in the update are untouched. Progress is clamped.
    pub fn apply(&mut self, update: &ProjectUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(progress) = update.progress {
            self.progress = Some(clamp_progress(progress));
        }
        if let Some(workspace_id) = &update.workspace_id {
            self.workspace_id = Some(workspace_id.clone());
        }
        if let Some(member_count) = update.member_count {
            self.member_count = Some(member_count);
        }
        if let Some(at) = update.last_activity_at {
            self.last_activity_at = Some(at);
        }
        if let Some(deadline) = update.next_deadline {
            self.next_deadline = Some(deadline);
        }
        if let Some(at) = update.updated_at {
            self.updated_at = Some(at);
        }
        if let Some(category) = &update.category {
            self.category = Some(category.clone());
        }
        if let Some(technologies) = &update.technologies {
            self.technologies = technologies.clone();
        }
        if let Some(visibility) = update.visibility {
            self.visibility = Some(visibility);
        }
        if let Some(url) = &update.thumbnail_url {
            self.thumbnail_url = Some(url.clone());
        }
    }
}

/// Partial update for the active project.
///
/// Carries no `id`: the identity of the active project cannot be changed by
/// an update, only by selecting another project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    /// Raw progress; clamped into `[0, 100]` when applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<ProjectVisibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl ProjectUpdate {
    /// Update that only sets progress.
    pub fn progress(progress: i64) -> Self {
        Self {
            progress: Some(progress),
            ..Default::default()
        }
    }

    /// Update that only sets status.
    pub fn status(status: ProjectStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Returns true if no field is supplied.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================================================
// Source shapes
// ============================================================================

/// Fields shared by every project shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBasics {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    /// Raw progress as sent by the source; may be out of range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i64>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProjectBasics {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            status: ProjectStatus::default(),
            progress: None,
            technologies: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// Full project entity as returned by `GET /projects/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntity {
    #[serde(flatten)]
    pub basics: ProjectBasics,
    #[serde(default)]
    pub member_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Lightweight project listing entry used by dashboards and pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub basics: ProjectBasics,
    pub member_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<ProjectVisibility>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_progress() {
        assert_eq!(clamp_progress(-5), 0);
        assert_eq!(clamp_progress(42), 42);
        assert_eq!(clamp_progress(150), 100);
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&ProjectStatus::OnHold).unwrap();
        assert_eq!(json, "\"on-hold\"");
        let parsed: ProjectStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(parsed, ProjectStatus::Archived);
        assert_eq!(ProjectStatus::OnHold.to_string(), "on-hold");
    }

    #[test]
    fn test_apply_merges_only_supplied_fields() {
        let mut project = ActiveProject::minimal("p-1", "Robotics");
        project.description = Some("Build a rover".to_string());

        project.apply(&ProjectUpdate {
            name: Some("Robotics II".to_string()),
            progress: Some(150),
            ..Default::default()
        });

        assert_eq!(project.id, "p-1");
        assert_eq!(project.name, "Robotics II");
        assert_eq!(project.description.as_deref(), Some("Build a rover"));
        assert_eq!(project.progress, Some(100));
    }

    #[test]
    fn test_entity_deserializes_flattened_basics() {
        let json = r#"{
            "id": "p-7",
            "name": "Data Viz",
            "status": "active",
            "progress": 40,
            "memberIds": ["u-1", "u-2"],
            "workspaceId": "w-1"
        }"#;
        let entity: ProjectEntity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.basics.id, "p-7");
        assert_eq!(entity.basics.status, ProjectStatus::Active);
        assert_eq!(entity.member_ids.len(), 2);
        assert_eq!(entity.workspace_id.as_deref(), Some("w-1"));
    }

    #[test]
    fn test_update_is_empty() {
        assert!(ProjectUpdate::default().is_empty());
        assert!(!ProjectUpdate::progress(10).is_empty());
    }
}
