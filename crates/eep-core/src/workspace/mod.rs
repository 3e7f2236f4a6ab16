//! Workspace domain module.
//!
//! - `model`: the canonical [`ActiveWorkspace`] record, its partial update,
//!   and the workspace shapes exchanged with the rest of the platform.

mod model;

pub use model::{
    ActiveWorkspace, WorkspaceBasics, WorkspaceEntity, WorkspaceStatus, WorkspaceSummary,
    WorkspaceUpdate, WorkspaceVisibility,
};
