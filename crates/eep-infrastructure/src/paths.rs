//! Unified path management for EEP files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/eep/                  # Config directory
//! ├── config.toml                 # Application configuration
//! └── eep_active_project.json     # Persisted active project snapshot
//! ```

use eep_core::snapshot::ACTIVE_PROJECT_STORAGE_KEY;
use std::path::PathBuf;

const APP_DIR_NAME: &str = "eep";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for eep_core::EepError {
    fn from(err: PathError) -> Self {
        eep_core::EepError::config(err.to_string())
    }
}

/// Resolves where EEP keeps its files.
///
/// With a base override every path lives under that directory, which is what
/// tests and the CLI `--config-dir` flag use.
#[derive(Debug, Clone, Default)]
pub struct EepPaths {
    base: Option<PathBuf>,
}

impl EepPaths {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    /// Returns the EEP configuration directory (e.g. `~/.config/eep/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path of the persisted active project slot.
    pub fn snapshot_file(&self) -> Result<PathBuf, PathError> {
        Ok(self
            .config_dir()?
            .join(format!("{}.json", ACTIVE_PROJECT_STORAGE_KEY)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_override() {
        let paths = EepPaths::new(Some(PathBuf::from("/tmp/eep-test")));
        assert_eq!(paths.config_dir().unwrap(), PathBuf::from("/tmp/eep-test"));
        assert_eq!(
            paths.config_file().unwrap(),
            PathBuf::from("/tmp/eep-test/config.toml")
        );
    }

    #[test]
    fn test_snapshot_file_uses_storage_key() {
        let paths = EepPaths::new(Some(PathBuf::from("/tmp/eep-test")));
        let file = paths.snapshot_file().unwrap();
        assert!(file.ends_with("eep_active_project.json"));
    }

    #[test]
    fn test_default_config_dir_ends_with_app_name() {
        if let Ok(dir) = EepPaths::default().config_dir() {
            assert!(dir.ends_with("eep"));
        }
    }
}
