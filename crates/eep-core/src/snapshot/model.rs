use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::project::ActiveProject;
use crate::workspace::ActiveWorkspace;

/// Fixed application-wide key of the persisted slot.
pub const ACTIVE_PROJECT_STORAGE_KEY: &str = "eep_active_project";

/// Default snapshot lifetime, in hours.
pub const DEFAULT_TTL_HOURS: u32 = 24;

/// Longest accepted snapshot lifetime (ten years), in hours.
pub const MAX_TTL_HOURS: u32 = 24 * 365 * 10;

/// The active project together with the workspace that contains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSelection {
    pub project: ActiveProject,
    pub workspace: ActiveWorkspace,
}

impl ActiveSelection {
    pub fn new(project: ActiveProject, workspace: ActiveWorkspace) -> Self {
        Self { project, workspace }
    }
}

/// Durable record written to the persisted slot.
///
/// Names are denormalized so a minimal restore works even when the full
/// records are missing (older snapshots only carried ids and names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub project_id: String,
    pub workspace_id: String,
    pub project_name: String,
    pub workspace_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_data: Option<ActiveProject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_data: Option<ActiveWorkspace>,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// `timestamp + ttl`; the record is absent for every reader afterwards.
    pub expires_at: DateTime<Utc>,
}

impl PersistedSnapshot {
    /// Builds a snapshot created at `now` that expires after `ttl_hours`.
    ///
    /// The TTL is clamped into `[1, MAX_TTL_HOURS]` so `expires_at` stays
    /// strictly after `timestamp`. Expiry saturates at the latest
    /// representable instant instead of overflowing.
    pub fn new(
        project: &ActiveProject,
        workspace: &ActiveWorkspace,
        now: DateTime<Utc>,
        ttl_hours: u32,
    ) -> Self {
        let ttl = Duration::hours(i64::from(ttl_hours.clamp(1, MAX_TTL_HOURS)));
        let expires_at = now
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            project_id: project.id.clone(),
            workspace_id: workspace.id.clone(),
            project_name: project.name.clone(),
            workspace_name: workspace.name.clone(),
            project_data: Some(project.clone()),
            workspace_data: Some(workspace.clone()),
            timestamp: now,
            expires_at,
        }
    }

    /// Whether the snapshot has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Time left before expiry, or `None` once expired.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.is_expired_at(now) {
            None
        } else {
            Some(self.expires_at - now)
        }
    }

    /// Full project record, or a degraded one built from id and name.
    pub fn project(&self) -> ActiveProject {
        self.project_data
            .clone()
            .unwrap_or_else(|| ActiveProject::minimal(&self.project_id, &self.project_name))
    }

    /// Full workspace record, or a degraded one built from id and name.
    pub fn workspace(&self) -> ActiveWorkspace {
        self.workspace_data
            .clone()
            .unwrap_or_else(|| ActiveWorkspace::minimal(&self.workspace_id, &self.workspace_name))
    }

    /// Restores the selection held by this snapshot.
    pub fn selection(&self) -> ActiveSelection {
        ActiveSelection::new(self.project(), self.workspace())
    }
}
