//! In-process snapshot slot.

use async_trait::async_trait;
use eep_core::error::{EepError, Result};
use eep_core::snapshot::SnapshotSlot;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// A [`SnapshotSlot`] kept in memory.
///
/// Clones share the same slot. Writes can be made to fail, which is how tests
/// simulate an unavailable or full storage backend.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotSlot {
    contents: Arc<Mutex<Option<String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemorySnapshotSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Replaces the raw slot contents, bypassing the codec.
    pub async fn put_raw(&self, contents: impl Into<String>) {
        *self.contents.lock().await = Some(contents.into());
    }

    /// Raw slot contents.
    pub async fn raw(&self) -> Option<String> {
        self.contents.lock().await.clone()
    }
}

#[async_trait]
impl SnapshotSlot for MemorySnapshotSlot {
    async fn read(&self) -> Result<Option<String>> {
        Ok(self.contents.lock().await.clone())
    }

    async fn write(&self, contents: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(EepError::storage("storage quota exceeded"));
        }
        *self.contents.lock().await = Some(contents.to_string());
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        *self.contents.lock().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_contents() {
        let slot = MemorySnapshotSlot::new();
        let other = slot.clone();

        slot.write("hello").await.unwrap();

        assert_eq!(other.read().await.unwrap().as_deref(), Some("hello"));
        other.remove().await.unwrap();
        assert!(slot.raw().await.is_none());
    }

    #[tokio::test]
    async fn test_failing_writes_keep_previous_contents() {
        let slot = MemorySnapshotSlot::new();
        slot.write("first").await.unwrap();
        slot.set_fail_writes(true);

        assert!(slot.write("second").await.is_err());
        assert_eq!(slot.raw().await.as_deref(), Some("first"));
    }
}
