//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

// =============================================================================
// Bot Defaults
// =============================================================================

pub fn default_bot_name() -> String {
    "staffrelay".to_string()
}

pub fn default_data_path() -> String {
    "data/serverConfig.json".to_string()
}

// =============================================================================
// AutoMod Defaults
// =============================================================================

pub fn default_spam_threshold() -> usize {
    5
}

pub fn default_time_window_ms() -> u64 {
    10_000
}

pub fn default_duplicate_threshold() -> usize {
    3
}

pub fn default_caps_threshold() -> f32 {
    0.8
}

pub fn default_min_message_length() -> usize {
    5
}

pub fn default_max_mentions() -> usize {
    3
}

pub fn default_timeout_secs() -> u64 {
    300
}

// =============================================================================
// Relay Defaults
// =============================================================================

pub fn default_inbound_marker() -> String {
    "📬".to_string()
}

pub fn default_outbound_marker() -> String {
    "✅".to_string()
}

pub fn default_thread_prefix() -> String {
    "dm".to_string()
}

pub fn default_no_session_notice() -> String {
    "👋 You don't have an active conversation. To contact staff, please go to the server \
     you need help with and use a command to open a new session."
        .to_string()
}
