//! Loads [`EepConfig`] from `config.toml`.
//!
//! Priority: environment variables > config.toml > defaults.

use crate::paths::EepPaths;
use eep_core::config::EepConfig;
use eep_core::error::Result;
use std::path::{Path, PathBuf};

/// Overrides `api.base_url`.
pub const ENV_API_URL: &str = "EEP_API_URL";
/// Overrides `api.token`.
pub const ENV_API_TOKEN: &str = "EEP_API_TOKEN";

/// Reads the EEP configuration file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses `config.toml` under the resolved EEP config directory.
    pub fn new(paths: &EepPaths) -> Result<Self> {
        Ok(Self {
            path: paths.config_file()?,
        })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file, applies environment overrides, and validates.
    ///
    /// A missing file yields defaults. A malformed file is an error.
    pub fn load(&self) -> Result<EepConfig> {
        let config = self.load_file()?;
        let config = apply_overrides(config, |key| std::env::var(key).ok());
        Ok(validate(config))
    }

    fn load_file(&self) -> Result<EepConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "[ConfigService] {} not found, using defaults",
                self.path.display()
            );
            return Ok(EepConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(EepConfig::default());
        }
        Ok(toml::from_str(&content)?)
    }
}

/// Applies environment overrides read through `lookup`.
fn apply_overrides<F>(mut config: EepConfig, lookup: F) -> EepConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
        config.api.base_url = url;
    }
    if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.is_empty()) {
        config.api.token = Some(token);
    }
    config
}

fn validate(mut config: EepConfig) -> EepConfig {
    let (active_project, corrections) = config.active_project.validated();
    for correction in corrections {
        tracing::warn!("[ConfigService] {}", correction);
    }
    config.active_project = active_project;
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));
        let config = service.load_file().unwrap();
        assert_eq!(config, EepConfig::default());
    }

    #[test]
    fn test_load_reads_sections() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[active_project]
auto_expire_hours = 12
enable_notifications = false

[api]
base_url = "https://eep.example/api"
timeout_secs = 3
"#,
        )
        .unwrap();

        let config = ConfigService::with_path(path).load_file().unwrap();
        assert_eq!(config.active_project.auto_expire_hours, 12);
        assert!(!config.active_project.enable_notifications);
        assert!(config.active_project.enable_persistence);
        assert_eq!(config.api.timeout_secs, 3);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[active_project\nauto_expire_hours = ").unwrap();

        let err = ConfigService::with_path(path).load_file().unwrap_err();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_env_overrides_win() {
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "https://staging.eep.example/api"),
            (ENV_API_TOKEN, "secret"),
        ]
        .into_iter()
        .collect();

        let config = apply_overrides(EepConfig::default(), |key| {
            env.get(key).map(|v| v.to_string())
        });

        assert_eq!(config.api.base_url, "https://staging.eep.example/api");
        assert_eq!(config.api.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_validate_repairs_zero_ttl() {
        let mut config = EepConfig::default();
        config.active_project.auto_expire_hours = 0;
        assert_eq!(validate(config).active_project.auto_expire_hours, 24);
    }
}
