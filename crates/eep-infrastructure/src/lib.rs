//! Infrastructure adapters for the EEP active project context.

pub mod config_service;
pub mod http_project_api;
pub mod memory_project_api;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::http_project_api::HttpProjectApi;
pub use crate::memory_project_api::InMemoryProjectApi;
pub use crate::paths::EepPaths;
pub use crate::storage::{FileSnapshotSlot, MemorySnapshotSlot, SnapshotStorage};
