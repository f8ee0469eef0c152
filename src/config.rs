//! Runtime configuration.
//!
//! Session token and database location belong to the external launcher;
//! this config only carries the tuning knobs of the runtime itself. All
//! values have defaults matching the documented behavior (10 toggles per
//! 10 minutes, 10-minute sync cool-down and cache TTL).

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tuning knobs for the component runtime.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum accepted module enable/disable invocations per guild
    /// within one rate-limit window.
    pub toggle_rate_limit: u32,
    /// Length of the toggle rate-limit window in seconds.
    pub toggle_window_secs: u64,
    /// Cool-down between manual `sync-commands` runs in seconds.
    pub sync_cooldown_secs: u64,
    /// Period of the volatile-cache sweeper in seconds.
    pub cache_sweep_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            toggle_rate_limit: 10,
            toggle_window_secs: 600,
            sync_cooldown_secs: 600,
            cache_sweep_secs: 600,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn toggle_window(&self) -> Duration {
        Duration::from_secs(self.toggle_window_secs)
    }

    pub fn sync_cooldown(&self) -> Duration {
        Duration::from_secs(self.sync_cooldown_secs)
    }

    pub fn cache_sweep_period(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_limits() {
        let config = RuntimeConfig::default();
        assert_eq!(config.toggle_rate_limit, 10);
        assert_eq!(config.toggle_window(), Duration::from_secs(600));
        assert_eq!(config.sync_cooldown(), Duration::from_secs(600));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: RuntimeConfig = toml::from_str("toggle_rate_limit = 3").unwrap();
        assert_eq!(config.toggle_rate_limit, 3);
        assert_eq!(config.sync_cooldown_secs, 600);
    }
}
