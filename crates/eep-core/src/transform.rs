//! Transform layer.
//!
//! Maps the project and workspace shapes used across the platform into the
//! canonical [`ActiveProject`] / [`ActiveWorkspace`] records. Both
//! normalizers are pure, total, and idempotent.

use crate::project::{
    ActiveProject, ProjectBasics, ProjectEntity, ProjectSummary, clamp_progress,
};
use crate::workspace::{ActiveWorkspace, WorkspaceBasics, WorkspaceEntity, WorkspaceSummary};

/// Any project shape accepted by [`normalize_project`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectShape {
    /// Full entity carrying `member_ids`.
    Entity(ProjectEntity),
    /// Listing entry carrying `member_count`.
    Summary(ProjectSummary),
    /// Only the common fields.
    Basics(ProjectBasics),
    /// Already canonical.
    Canonical(ActiveProject),
}

impl From<ProjectEntity> for ProjectShape {
    fn from(value: ProjectEntity) -> Self {
        Self::Entity(value)
    }
}

impl From<ProjectSummary> for ProjectShape {
    fn from(value: ProjectSummary) -> Self {
        Self::Summary(value)
    }
}

impl From<ProjectBasics> for ProjectShape {
    fn from(value: ProjectBasics) -> Self {
        Self::Basics(value)
    }
}

impl From<ActiveProject> for ProjectShape {
    fn from(value: ActiveProject) -> Self {
        Self::Canonical(value)
    }
}

/// Any workspace shape accepted by [`normalize_workspace`].
#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceShape {
    /// Full entity carrying `project_ids`.
    Entity(WorkspaceEntity),
    /// Listing entry carrying an explicit `project_count`.
    Summary(WorkspaceSummary),
    /// Already canonical.
    Canonical(ActiveWorkspace),
}

impl From<WorkspaceEntity> for WorkspaceShape {
    fn from(value: WorkspaceEntity) -> Self {
        Self::Entity(value)
    }
}

impl From<WorkspaceSummary> for WorkspaceShape {
    fn from(value: WorkspaceSummary) -> Self {
        Self::Summary(value)
    }
}

impl From<ActiveWorkspace> for WorkspaceShape {
    fn from(value: ActiveWorkspace) -> Self {
        Self::Canonical(value)
    }
}

/// Converts a collection length into a count, saturating at `u32::MAX`.
pub(crate) fn saturating_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

fn project_from_basics(basics: ProjectBasics) -> ActiveProject {
    let mut project = ActiveProject::minimal(basics.id, basics.name);
    project.description = basics.description;
    project.status = basics.status;
    project.progress = basics.progress.map(clamp_progress);
    project.technologies = basics.technologies;
    project.created_at = basics.created_at;
    project.updated_at = basics.updated_at;
    project
}

/// Normalizes any project shape into an [`ActiveProject`].
///
/// Common fields are copied verbatim (progress clamped). A summary
/// contributes its member count, activity timestamp, category, thumbnail and
/// visibility; an entity contributes a member count derived from its member
/// list, its activity timestamp, category and workspace back-reference.
pub fn normalize_project(input: impl Into<ProjectShape>) -> ActiveProject {
    match input.into() {
        ProjectShape::Summary(summary) => {
            let mut project = project_from_basics(summary.basics);
            project.member_count = Some(summary.member_count);
            project.last_activity_at = summary.last_activity_at;
            project.category = summary.category;
            project.thumbnail_url = summary.thumbnail_url;
            project.visibility = summary.visibility;
            project
        }
        ProjectShape::Entity(entity) => {
            let mut project = project_from_basics(entity.basics);
            project.member_count = Some(saturating_count(entity.member_ids.len()));
            project.last_activity_at = entity.last_activity_at;
            project.category = entity.category;
            project.workspace_id = entity.workspace_id;
            project
        }
        ProjectShape::Basics(basics) => project_from_basics(basics),
        ProjectShape::Canonical(mut project) => {
            project.progress = project.progress.map(|p| clamp_progress(p as i64));
            project
        }
    }
}

fn workspace_from_basics(basics: WorkspaceBasics) -> ActiveWorkspace {
    let mut workspace = ActiveWorkspace::minimal(basics.id, basics.name);
    workspace.description = basics.description;
    workspace.status = basics.status;
    workspace.visibility = basics.visibility;
    workspace.member_count = basics.member_count;
    workspace.tags = basics.tags;
    workspace.created_at = basics.created_at;
    workspace.updated_at = basics.updated_at;
    workspace
}

/// Normalizes any workspace shape into an [`ActiveWorkspace`].
///
/// `project_count` is derived from the project id list when one is present,
/// otherwise the explicit count is trusted.
pub fn normalize_workspace(input: impl Into<WorkspaceShape>) -> ActiveWorkspace {
    match input.into() {
        WorkspaceShape::Entity(entity) => {
            let mut workspace = workspace_from_basics(entity.basics);
            workspace.project_ids = Some(entity.project_ids);
            workspace.sync_project_count();
            workspace
        }
        WorkspaceShape::Summary(summary) => {
            let mut workspace = workspace_from_basics(summary.basics);
            workspace.project_count = summary.project_count;
            workspace
        }
        WorkspaceShape::Canonical(mut workspace) => {
            workspace.sync_project_count();
            workspace
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{ProjectStatus, ProjectVisibility};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_saturating_count() {
        assert_eq!(saturating_count(0), 0);
        assert_eq!(saturating_count(3), 3);
        assert_eq!(saturating_count(usize::MAX), u32::MAX);
    }

    fn basics(progress: Option<i64>) -> ProjectBasics {
        let mut basics = ProjectBasics::new("p-1", "Robotics");
        basics.status = ProjectStatus::Active;
        basics.progress = progress;
        basics.technologies = vec!["rust".to_string(), "ros".to_string()];
        basics.created_at = Some(Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap());
        basics
    }

    #[test]
    fn test_summary_branch() {
        let summary = ProjectSummary {
            basics: basics(Some(30)),
            member_count: 4,
            last_activity_at: None,
            category: Some("hardware".to_string()),
            thumbnail_url: Some("https://cdn.example/p-1.png".to_string()),
            visibility: Some(ProjectVisibility::Workspace),
        };

        let project = normalize_project(summary);

        assert_eq!(project.member_count, Some(4));
        assert_eq!(project.category.as_deref(), Some("hardware"));
        assert_eq!(project.visibility, Some(ProjectVisibility::Workspace));
        assert_eq!(project.thumbnail_url.as_deref(), Some("https://cdn.example/p-1.png"));
        assert!(project.workspace_id.is_none());
        assert_eq!(project.technologies, vec!["rust", "ros"]);
    }

    #[test]
    fn test_entity_branch_derives_member_count() {
        let entity = ProjectEntity {
            basics: basics(Some(60)),
            member_ids: vec!["u-1".into(), "u-2".into(), "u-3".into()],
            workspace_id: Some("w-1".to_string()),
            last_activity_at: None,
            category: None,
        };

        let project = normalize_project(entity);

        assert_eq!(project.member_count, Some(3));
        assert_eq!(project.workspace_id.as_deref(), Some("w-1"));
        assert!(project.thumbnail_url.is_none());
        assert!(project.visibility.is_none());
    }

    #[test]
    fn test_basics_only_populates_common_fields() {
        let project = normalize_project(basics(None));
        assert!(project.member_count.is_none());
        assert!(project.workspace_id.is_none());
        assert!(project.category.is_none());
        assert_eq!(project.status, ProjectStatus::Active);
    }

    #[test]
    fn test_progress_is_clamped() {
        assert_eq!(normalize_project(basics(Some(250))).progress, Some(100));
        assert_eq!(normalize_project(basics(Some(-20))).progress, Some(0));
        assert_eq!(normalize_project(basics(None)).progress, None);

        let mut canonical = ActiveProject::minimal("p-2", "Raw");
        canonical.progress = Some(180);
        assert_eq!(normalize_project(canonical).progress, Some(100));
    }

    #[test]
    fn test_normalize_project_is_idempotent() {
        let entity = ProjectEntity {
            basics: basics(Some(75)),
            member_ids: vec!["u-1".into()],
            workspace_id: Some("w-1".to_string()),
            last_activity_at: Some(Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap()),
            category: Some("ml".to_string()),
        };

        let once = normalize_project(entity);
        let twice = normalize_project(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_workspace_entity_derives_project_count() {
        let entity = WorkspaceEntity {
            basics: WorkspaceBasics::new("w-1", "Cohort 7"),
            project_ids: vec!["p-1".into(), "p-2".into()],
        };

        let workspace = normalize_workspace(entity);

        assert_eq!(workspace.project_count, 2);
        assert_eq!(workspace.contains_project("p-1"), Some(true));
    }

    #[test]
    fn test_workspace_summary_trusts_explicit_count() {
        let summary = WorkspaceSummary {
            basics: WorkspaceBasics::new("w-1", "Cohort 7"),
            project_count: 12,
        };

        let workspace = normalize_workspace(summary);

        assert_eq!(workspace.project_count, 12);
        assert!(workspace.project_ids.is_none());
    }

    #[test]
    fn test_normalize_workspace_repairs_count_and_is_idempotent() {
        let mut canonical = ActiveWorkspace::minimal("w-1", "Cohort 7");
        canonical.project_ids = Some(vec!["p-1".into()]);
        canonical.project_count = 5;

        let once = normalize_workspace(canonical);
        assert_eq!(once.project_count, 1);
        assert_eq!(normalize_workspace(once.clone()), once);
    }
}
