//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::automod::AutoModConfig;
use super::defaults::{default_bot_name, default_data_path};
use super::relay::RelayConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Bot identity and storage.
    #[serde(default)]
    pub bot: BotConfig,
    /// Spam detection and enforcement.
    #[serde(default)]
    pub automod: AutoModConfig,
    /// Staff relay presentation.
    #[serde(default)]
    pub relay: RelayConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Display name used as the moderator in audit events.
    #[serde(default = "default_bot_name")]
    pub name: String,
    /// Path of the persisted server document.
    #[serde(default = "default_data_path")]
    pub data_path: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            data_path: default_data_path(),
        }
    }
}
