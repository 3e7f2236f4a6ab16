//! Active project context.
//!
//! [`ActiveProjectStore`] owns the selected project and workspace, keeps the
//! persisted snapshot in sync, and exposes the derived views in [`views`].

mod store;
mod sweeper;
pub mod views;

pub use store::{ActiveProjectStore, ClearReason, RefreshOutcome};
pub use views::{
    ProgressBand, ProjectAlert, ProjectNavigation, SessionTimer, StatusSummary, format_elapsed,
    project_alerts,
};
