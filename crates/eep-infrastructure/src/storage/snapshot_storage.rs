//! Storage codec for the active project snapshot.
//!
//! Serializes a [`PersistedSnapshot`] as JSON into a [`SnapshotSlot`] and is
//! the only component that writes or erases the slot. Every failure is
//! logged and degrades to "no data".

use async_trait::async_trait;
use eep_core::clock::Clock;
use eep_core::error::Result;
use eep_core::project::{ActiveProject, ProjectUpdate};
use eep_core::snapshot::{ActiveSelection, PersistedSnapshot, SnapshotRepository, SnapshotSlot};
use eep_core::transform::{normalize_project, normalize_workspace};
use eep_core::workspace::{ActiveWorkspace, WorkspaceUpdate};
use std::sync::Arc;

/// [`SnapshotRepository`] over any [`SnapshotSlot`].
#[derive(Clone)]
pub struct SnapshotStorage {
    slot: Arc<dyn SnapshotSlot>,
    clock: Arc<dyn Clock>,
}

impl SnapshotStorage {
    pub fn new(slot: Arc<dyn SnapshotSlot>, clock: Arc<dyn Clock>) -> Self {
        Self { slot, clock }
    }

    /// Reads and parses the slot.
    async fn read_snapshot(&self) -> Result<Option<PersistedSnapshot>> {
        match self.slot.read().await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn write_snapshot(&self, snapshot: &PersistedSnapshot) -> Result<()> {
        let raw = serde_json::to_string(snapshot)?;
        self.slot.write(&raw).await
    }

    /// Reads the slot, erasing it when it is corrupt or expired.
    ///
    /// Returns only a snapshot every reader may treat as present.
    async fn read_live(&self) -> Option<PersistedSnapshot> {
        match self.read_snapshot().await {
            Ok(Some(snapshot)) if snapshot.is_expired_at(self.clock.now()) => {
                tracing::info!(
                    "[SnapshotStorage] Snapshot for project {} expired at {}, erasing",
                    snapshot.project_id,
                    snapshot.expires_at
                );
                self.erase().await;
                None
            }
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("[SnapshotStorage] Discarding unreadable snapshot: {}", e);
                self.erase().await;
                None
            }
        }
    }

    async fn erase(&self) -> bool {
        match self.slot.remove().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("[SnapshotStorage] Failed to erase snapshot: {}", e);
                false
            }
        }
    }

    async fn persist(&self, snapshot: &PersistedSnapshot) -> bool {
        match self.write_snapshot(snapshot).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("[SnapshotStorage] Failed to persist snapshot: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl SnapshotRepository for SnapshotStorage {
    async fn save(
        &self,
        project: &ActiveProject,
        workspace: &ActiveWorkspace,
        ttl_hours: u32,
    ) -> bool {
        let snapshot = PersistedSnapshot::new(project, workspace, self.clock.now(), ttl_hours);
        let saved = self.persist(&snapshot).await;
        if saved {
            tracing::debug!(
                "[SnapshotStorage] Saved project {} / workspace {} until {}",
                snapshot.project_id,
                snapshot.workspace_id,
                snapshot.expires_at
            );
        }
        saved
    }

    async fn load(&self) -> Option<ActiveSelection> {
        let snapshot = self.read_live().await?;
        if snapshot.project_data.is_none() || snapshot.workspace_data.is_none() {
            tracing::debug!(
                "[SnapshotStorage] Snapshot for project {} lacks full data, restoring minimal records",
                snapshot.project_id
            );
        }
        let selection = snapshot.selection();
        Some(ActiveSelection::new(
            normalize_project(selection.project),
            normalize_workspace(selection.workspace),
        ))
    }

    async fn update_project(&self, update: &ProjectUpdate) -> bool {
        let Some(mut snapshot) = self.read_live().await else {
            return false;
        };

        let mut project = snapshot.project();
        project.apply(update);
        snapshot.project_name = project.name.clone();
        snapshot.project_data = Some(project);

        self.persist(&snapshot).await
    }

    async fn update_workspace(&self, update: &WorkspaceUpdate) -> bool {
        let Some(mut snapshot) = self.read_live().await else {
            return false;
        };

        let mut workspace = snapshot.workspace();
        workspace.apply(update);
        snapshot.workspace_name = workspace.name.clone();
        snapshot.workspace_data = Some(workspace);

        self.persist(&snapshot).await
    }

    async fn clear(&self) -> bool {
        self.erase().await
    }

    async fn is_expired(&self) -> bool {
        match self.read_snapshot().await {
            Ok(Some(snapshot)) => snapshot.is_expired_at(self.clock.now()),
            Ok(None) => true,
            Err(e) => {
                tracing::debug!("[SnapshotStorage] Unreadable snapshot counts as expired: {}", e);
                true
            }
        }
    }

    async fn peek(&self) -> Option<PersistedSnapshot> {
        self.read_snapshot().await.ok().flatten()
    }
}
