//! Staff relay presentation settings.

use serde::Deserialize;

use super::defaults::{
    default_inbound_marker, default_no_session_notice, default_outbound_marker,
    default_thread_prefix,
};

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Reaction put on a user's DM once it reached the staff thread.
    #[serde(default = "default_inbound_marker")]
    pub inbound_marker: String,
    /// Reaction put on a staff reply once it reached the user.
    #[serde(default = "default_outbound_marker")]
    pub outbound_marker: String,
    /// Prefix for staff thread names (`<prefix>-<user tag>`).
    #[serde(default = "default_thread_prefix")]
    pub thread_prefix: String,
    /// Reply sent to users who DM the bot without an open session.
    #[serde(default = "default_no_session_notice")]
    pub no_session_notice: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            inbound_marker: default_inbound_marker(),
            outbound_marker: default_outbound_marker(),
            thread_prefix: default_thread_prefix(),
            no_session_notice: default_no_session_notice(),
        }
    }
}
