//! Persisted snapshot of the active project.
//!
//! - `model`: the durable [`PersistedSnapshot`] record and [`ActiveSelection`]
//! - `repository`: the [`SnapshotSlot`] and [`SnapshotRepository`] traits

mod model;
pub mod repository;

pub use model::{
    ACTIVE_PROJECT_STORAGE_KEY, ActiveSelection, DEFAULT_TTL_HOURS, MAX_TTL_HOURS,
    PersistedSnapshot,
};
pub use repository::{SnapshotRepository, SnapshotSlot};
