//! AutoMod configuration: spam window thresholds and enforcement.

use serde::Deserialize;
use std::time::Duration;

use super::defaults::{
    default_caps_threshold, default_duplicate_threshold, default_max_mentions,
    default_min_message_length, default_spam_threshold, default_time_window_ms,
    default_timeout_secs,
};

/// Spam detection thresholds and the action taken on a positive verdict.
#[derive(Debug, Clone, Deserialize)]
pub struct AutoModConfig {
    /// AutoMod state for guilds that never toggled it (default: false).
    #[serde(default)]
    pub enabled_by_default: bool,
    /// Messages inside the window that count as spam (default: 5).
    #[serde(default = "default_spam_threshold")]
    pub spam_threshold: usize,
    /// Sliding window length in milliseconds (default: 10000).
    #[serde(default = "default_time_window_ms")]
    pub time_window_ms: u64,
    /// Copies of the same normalized message that count as spam (default: 3).
    #[serde(default = "default_duplicate_threshold")]
    pub duplicate_threshold: usize,
    /// Uppercase/letter ratio for the caps predicate (default: 0.8).
    #[serde(default = "default_caps_threshold")]
    pub caps_threshold: f32,
    /// Letters required before the caps predicate applies (default: 5).
    #[serde(default = "default_min_message_length")]
    pub min_message_length: usize,
    /// Mentions tolerated in one message (default: 3).
    #[serde(default = "default_max_mentions")]
    pub max_mentions: usize,
    /// Timeout applied to spammers, in seconds (default: 300).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl AutoModConfig {
    pub fn time_window(&self) -> Duration {
        Duration::from_millis(self.time_window_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AutoModConfig {
    fn default() -> Self {
        Self {
            enabled_by_default: false,
            spam_threshold: default_spam_threshold(),
            time_window_ms: default_time_window_ms(),
            duplicate_threshold: default_duplicate_threshold(),
            caps_threshold: default_caps_threshold(),
            min_message_length: default_min_message_length(),
            max_mentions: default_max_mentions(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
