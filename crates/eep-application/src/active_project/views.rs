//! Read-only projections over the active selection.

use chrono::{DateTime, Duration, Utc};
use eep_core::notification::{Notification, NotificationLevel};
use eep_core::project::{ActiveProject, ProjectStatus};
use eep_core::workspace::ActiveWorkspace;

/// Days before a deadline at which it counts as approaching.
pub const DEADLINE_WARNING_DAYS: i64 = 7;
/// Progress below this while active is flagged.
pub const LOW_PROGRESS_THRESHOLD: u8 = 25;
/// Progress at or above this while not completed is flagged.
pub const NEARLY_COMPLETE_THRESHOLD: u8 = 90;

/// Coarse progress bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressBand {
    /// No progress reported, or zero.
    NotStarted,
    /// Below 25 %.
    Low,
    /// 25 % to 74 %.
    Moderate,
    /// 75 % to 99 %.
    High,
    Complete,
}

impl ProgressBand {
    pub fn from_progress(progress: Option<u8>) -> Self {
        match progress.unwrap_or(0) {
            0 => Self::NotStarted,
            p if p < LOW_PROGRESS_THRESHOLD => Self::Low,
            p if p < 75 => Self::Moderate,
            p if p < 100 => Self::High,
            _ => Self::Complete,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Complete => "complete",
        }
    }
}

/// Status and progress of the active project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    pub status: ProjectStatus,
    pub progress: Option<u8>,
    pub band: ProgressBand,
    pub is_active: bool,
    pub is_completed: bool,
    pub is_archived: bool,
    pub is_on_hold: bool,
    pub is_draft: bool,
}

impl StatusSummary {
    pub fn from_project(project: &ActiveProject) -> Self {
        let status = project.status;
        Self {
            status,
            progress: project.progress,
            band: ProgressBand::from_progress(project.progress),
            is_active: status == ProjectStatus::Active,
            is_completed: status == ProjectStatus::Completed,
            is_archived: status == ProjectStatus::Archived,
            is_on_hold: status == ProjectStatus::OnHold,
            is_draft: status == ProjectStatus::Draft,
        }
    }
}

/// Application paths for the active selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectNavigation {
    pub project: String,
    pub project_settings: String,
    pub project_members: String,
    pub workspace: String,
    pub workspace_settings: String,
}

impl ProjectNavigation {
    pub fn new(project: &ActiveProject, workspace: &ActiveWorkspace) -> Self {
        let workspace_path = format!("/workspaces/{}", workspace.id);
        let project_path = format!("{}/projects/{}", workspace_path, project.id);
        Self {
            project_settings: format!("{}/settings", project_path),
            project_members: format!("{}/members", project_path),
            workspace_settings: format!("{}/settings", workspace_path),
            project: project_path,
            workspace: workspace_path,
        }
    }
}

/// Deadline and progress threshold alerts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectAlert {
    DeadlineOverdue { project_name: String },
    DeadlineApproaching { project_name: String, days_left: i64 },
    LowProgress { project_name: String, progress: u8 },
    NearlyComplete { project_name: String, progress: u8 },
}

impl ProjectAlert {
    pub fn level(&self) -> NotificationLevel {
        match self {
            Self::DeadlineOverdue { .. } => NotificationLevel::Error,
            Self::DeadlineApproaching { .. } | Self::LowProgress { .. } => {
                NotificationLevel::Warning
            }
            Self::NearlyComplete { .. } => NotificationLevel::Info,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::DeadlineOverdue { .. } => "Deadline passed",
            Self::DeadlineApproaching { .. } => "Deadline approaching",
            Self::LowProgress { .. } => "Low progress",
            Self::NearlyComplete { .. } => "Almost there",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::DeadlineOverdue { project_name } => {
                format!("The deadline of \"{}\" has passed", project_name)
            }
            Self::DeadlineApproaching {
                project_name,
                days_left: 0,
            } => format!("\"{}\" is due today", project_name),
            Self::DeadlineApproaching {
                project_name,
                days_left,
            } => format!("\"{}\" is due in {} day(s)", project_name, days_left),
            Self::LowProgress {
                project_name,
                progress,
            } => format!("\"{}\" is only {}% complete", project_name, progress),
            Self::NearlyComplete {
                project_name,
                progress,
            } => format!(
                "\"{}\" is {}% complete, consider wrapping it up",
                project_name, progress
            ),
        }
    }

    pub fn to_notification(&self) -> Notification {
        Notification::new(self.level(), self.title(), self.message())
    }
}

/// Computes the alerts that apply to `project` at `now`.
pub fn project_alerts(project: &ActiveProject, now: DateTime<Utc>) -> Vec<ProjectAlert> {
    let mut alerts = Vec::new();
    let project_name = project.name.clone();

    if let Some(deadline) = project.next_deadline {
        if deadline < now {
            alerts.push(ProjectAlert::DeadlineOverdue {
                project_name: project_name.clone(),
            });
        } else if deadline - now <= Duration::days(DEADLINE_WARNING_DAYS) {
            alerts.push(ProjectAlert::DeadlineApproaching {
                project_name: project_name.clone(),
                days_left: (deadline - now).num_days(),
            });
        }
    }

    if let Some(progress) = project.progress {
        if project.status == ProjectStatus::Active && progress < LOW_PROGRESS_THRESHOLD {
            alerts.push(ProjectAlert::LowProgress {
                project_name: project_name.clone(),
                progress,
            });
        }
        if progress >= NEARLY_COMPLETE_THRESHOLD && project.status != ProjectStatus::Completed {
            alerts.push(ProjectAlert::NearlyComplete {
                project_name,
                progress,
            });
        }
    }

    alerts
}

/// Tracks time since a session started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimer {
    started_at: DateTime<Utc>,
}

impl SessionTimer {
    pub fn start(now: DateTime<Utc>) -> Self {
        Self { started_at: now }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Elapsed time, never negative.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (now - self.started_at).max(Duration::zero())
    }
}

/// Formats a duration as `1h 05m`, or `12m` under an hour.
pub fn format_elapsed(elapsed: Duration) -> String {
    let minutes = elapsed.num_minutes().max(0);
    if minutes < 60 {
        format!("{}m", minutes)
    } else {
        format!("{}h {:02}m", minutes / 60, minutes % 60)
    }
}
