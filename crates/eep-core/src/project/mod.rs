//! Project domain module.
//!
//! - `model`: the canonical [`ActiveProject`] record, its partial update, and
//!   the project shapes exchanged with the rest of the platform.

mod model;

pub use model::{
    ActiveProject, MAX_PROGRESS, ProjectBasics, ProjectEntity, ProjectStatus, ProjectSummary,
    ProjectUpdate, ProjectVisibility, clamp_progress,
};
