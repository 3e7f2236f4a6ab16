//! Snapshot persistence traits.

use async_trait::async_trait;

use super::model::{ActiveSelection, PersistedSnapshot};
use crate::error::Result;
use crate::project::{ActiveProject, ProjectUpdate};
use crate::workspace::{ActiveWorkspace, WorkspaceUpdate};

/// A single durable key-value slot holding one serialized string.
///
/// Implementations report real failures; deciding what a failure means is up
/// to the codec layered on top.
#[async_trait]
pub trait SnapshotSlot: Send + Sync {
    /// Reads the slot. `Ok(None)` when nothing is stored.
    async fn read(&self) -> Result<Option<String>>;

    /// Overwrites the slot.
    async fn write(&self, contents: &str) -> Result<()>;

    /// Erases the slot. Erasing an empty slot succeeds.
    async fn remove(&self) -> Result<()>;
}

/// Storage codec for the active project snapshot.
///
/// Persistence is best-effort: no method returns an error. Write-style
/// methods return `true` when the slot was actually written or erased, and
/// readers treat unreadable or expired data as absent.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Writes a fresh snapshot expiring `ttl_hours` from now, replacing any
    /// prior one.
    async fn save(&self, project: &ActiveProject, workspace: &ActiveWorkspace, ttl_hours: u32)
    -> bool;

    /// Restores the stored selection.
    ///
    /// Expired or corrupt records are erased and reported as `None`.
    async fn load(&self) -> Option<ActiveSelection>;

    /// Merges `update` into the stored project data. No-op without a snapshot.
    async fn update_project(&self, update: &ProjectUpdate) -> bool;

    /// Merges `update` into the stored workspace data. No-op without a snapshot.
    async fn update_workspace(&self, update: &WorkspaceUpdate) -> bool;

    /// Erases the slot unconditionally.
    async fn clear(&self) -> bool;

    /// True when no readable snapshot exists or its expiry has passed.
    ///
    /// Never mutates the slot.
    async fn is_expired(&self) -> bool;

    /// Raw stored snapshot, expired or not. Never mutates the slot.
    async fn peek(&self) -> Option<PersistedSnapshot>;
}
