//! Configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer; every field has a
//! default so a missing file or section yields a working configuration.

use serde::{Deserialize, Serialize};

use crate::snapshot::{DEFAULT_TTL_HOURS, MAX_TTL_HOURS};

/// Default interval of the background expiry sweep, in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Default API request timeout, in seconds.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// Default API base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// Construction-time options of the active project store.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ActiveProjectConfig {
    /// Snapshot lifetime in hours.
    pub auto_expire_hours: u32,
    /// Mirror the active pair to the persisted slot.
    pub enable_persistence: bool,
    /// Emit user-facing notifications.
    pub enable_notifications: bool,
    /// Interval of the background expiry sweep.
    pub sweep_interval_secs: u64,
}

impl Default for ActiveProjectConfig {
    fn default() -> Self {
        Self {
            auto_expire_hours: DEFAULT_TTL_HOURS,
            enable_persistence: true,
            enable_notifications: true,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

impl ActiveProjectConfig {
    /// Replaces values that would break store invariants with defaults.
    ///
    /// Returns the corrected config and a description of each replacement.
    pub fn validated(mut self) -> (Self, Vec<String>) {
        let mut corrections = Vec::new();
        if self.auto_expire_hours == 0 {
            corrections.push(format!(
                "auto_expire_hours must be positive, using {}",
                DEFAULT_TTL_HOURS
            ));
            self.auto_expire_hours = DEFAULT_TTL_HOURS;
        } else if self.auto_expire_hours > MAX_TTL_HOURS {
            corrections.push(format!(
                "auto_expire_hours must be at most {}, using {}",
                MAX_TTL_HOURS, DEFAULT_TTL_HOURS
            ));
            self.auto_expire_hours = DEFAULT_TTL_HOURS;
        }
        if self.sweep_interval_secs == 0 {
            corrections.push(format!(
                "sweep_interval_secs must be positive, using {}",
                DEFAULT_SWEEP_INTERVAL_SECS
            ));
            self.sweep_interval_secs = DEFAULT_SWEEP_INTERVAL_SECS;
        }
        (self, corrections)
    }
}

/// Connection settings for the platform API.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct EepConfig {
    pub active_project: ActiveProjectConfig,
    pub api: ApiConfig,
}
