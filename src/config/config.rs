//! Presence configuration
//! Compiled-in defaults with an optional YAML override file

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Ableton presence configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Discord application ID used for the IPC handshake
    #[serde(default = "default_app_id")]
    pub app_id: String,

    /// Display label of the tracked application
    #[serde(default = "default_app_label")]
    pub app_label: String,

    /// Seconds between two presence updates
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Free-form status shown under the project name
    #[serde(default = "default_custom_status")]
    pub custom_status: String,

    /// A stop longer than this ends the session instead of pausing it
    #[serde(default = "default_idle_reset_secs")]
    pub idle_reset_secs: u64,

    /// Pattern handed to `pgrep -f`
    #[serde(default = "default_process_pattern")]
    pub process_pattern: String,

    /// Application name addressed by AppleScript when reading the window title
    #[serde(default = "default_application_name")]
    pub application_name: String,

    /// Upper bound for a single probe call
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

fn default_app_id() -> String {
    "1385679105969885184".to_string()
}

fn default_app_label() -> String {
    "Ableton Live 12".to_string()
}

fn default_poll_interval_secs() -> u64 {
    15
}

fn default_custom_status() -> String {
    "Making music".to_string()
}

fn default_idle_reset_secs() -> u64 {
    2 * 60 * 60
}

fn default_process_pattern() -> String {
    "Live".to_string()
}

fn default_application_name() -> String {
    "Ableton Live 12 Suite".to_string()
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn idle_reset_duration(secs: u64) -> Option<chrono::Duration> {
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_id: default_app_id(),
            app_label: default_app_label(),
            poll_interval_secs: default_poll_interval_secs(),
            custom_status: default_custom_status(),
            idle_reset_secs: default_idle_reset_secs(),
            process_pattern: default_process_pattern(),
            application_name: default_application_name(),
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load config from the override file, falling back to defaults when absent
    pub fn load(path: Option<&str>) -> Result<Self> {
        let Some(config_path) = Self::config_path(path) else {
            debug!("No config directory available, using defaults");
            return Ok(Self::default());
        };

        if !config_path.exists() {
            debug!("Config file {:?} not found, using defaults", config_path);
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file {:?}", config_path))?;

        let config = Self::from_yaml(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", config_path))?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    /// Parse a YAML document; missing keys keep their defaults
    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: AppConfig = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.app_id.trim().is_empty() {
            anyhow::bail!("app_id must not be empty");
        }
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be greater than zero");
        }
        if self.custom_status.trim().is_empty() {
            anyhow::bail!("custom_status must not be empty");
        }
        if idle_reset_duration(self.idle_reset_secs).is_none() {
            anyhow::bail!(
                "idle_reset_secs is out of range: {}",
                self.idle_reset_secs
            );
        }
        if self.probe_timeout_secs == 0 {
            anyhow::bail!("probe_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    /// Get the config file path
    fn config_path(path: Option<&str>) -> Option<PathBuf> {
        // Check env override first
        if let Ok(env_path) = std::env::var("ABLETON_PRESENCE_CONFIG") {
            return Some(PathBuf::from(env_path));
        }

        if let Some(p) = path {
            return Some(PathBuf::from(p));
        }

        dirs::config_dir().map(|dir| dir.join("ableton-presence").join("config.yml"))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Saturates at the largest representable gap for values `validate` rejects
    pub fn idle_reset_threshold(&self) -> chrono::Duration {
        idle_reset_duration(self.idle_reset_secs).unwrap_or(chrono::Duration::MAX)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}
