//! File-backed snapshot slot with atomic writes.
//!
//! Provides:
//! - **Atomicity**: writes go to a temp file which is renamed over the slot
//! - **Isolation**: an exclusive lock file serializes writers across processes
//! - **Durability**: explicit fsync before rename

use async_trait::async_trait;
use eep_core::error::{EepError, Result};
use eep_core::snapshot::SnapshotSlot;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write as IoWrite};
use std::path::{Path, PathBuf};

/// A [`SnapshotSlot`] stored as a single file.
#[derive(Debug, Clone)]
pub struct FileSnapshotSlot {
    path: PathBuf,
}

impl FileSnapshotSlot {
    /// Creates a slot backed by `path`. The file is created on first write.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_blocking(path: &Path) -> Result<Option<String>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    fn write_blocking(path: &Path, contents: &str) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let _lock = FileLock::acquire(path)?;

        // Write to temporary file in the same directory
        let tmp_path = temp_path(path)?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(contents.as_bytes())?;

        // Ensure data is written to disk
        tmp_file.sync_all()?;
        drop(tmp_file);

        // Atomic rename
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    fn remove_blocking(path: &Path) -> Result<()> {
        let _lock = FileLock::acquire(path)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SnapshotSlot for FileSnapshotSlot {
    async fn read(&self) -> Result<Option<String>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::read_blocking(&path))
            .await
            .map_err(|e| EepError::internal(format!("Failed to join task: {}", e)))?
    }

    async fn write(&self, contents: &str) -> Result<()> {
        let path = self.path.clone();
        let contents = contents.to_string();
        tokio::task::spawn_blocking(move || Self::write_blocking(&path, &contents))
            .await
            .map_err(|e| EepError::internal(format!("Failed to join task: {}", e)))?
    }

    async fn remove(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::remove_blocking(&path))
            .await
            .map_err(|e| EepError::internal(format!("Failed to join task: {}", e)))?
    }
}

/// Gets a temporary file path next to `path` for atomic writes.
fn temp_path(path: &Path) -> Result<PathBuf> {
    let parent = path
        .parent()
        .ok_or_else(|| EepError::io("Path has no parent directory"))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| EepError::io("Path has no file name"))?;

    let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
    Ok(parent.join(tmp_name))
}

/// A file lock guard that automatically releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    /// Acquires an exclusive lock on the given path.
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| EepError::storage(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped
        let _ = fs::remove_file(&self.lock_path);
    }
}
