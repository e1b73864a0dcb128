//! Unified error handling for staffrelay.
//!
//! Port-level errors live next to their ports (`PlatformError`,
//! `PersistError`, `ConfigError`). This module holds the errors a staff
//! command can end in, with metric-style labels and the reply text shown to
//! the staff member who ran the command.

use crate::platform::{ChannelId, PlatformError, UserId};
use thiserror::Error;

// ============================================================================
// Relay Errors (staff command processing)
// ============================================================================

/// Errors that abort a staff relay command without mutating any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("target {0} is a bot")]
    BotTarget(String),

    #[error("unknown user: {0}")]
    UnknownUser(UserId),

    #[error("no relay channel configured")]
    NoRelayChannel,

    #[error("relay channel unavailable: {0}")]
    RelayChannelUnavailable(ChannelId),

    #[error("relay channel must be a text channel in this guild: {0}")]
    InvalidRelayChannel(ChannelId),

    #[error("thread creation failed: {0}")]
    ThreadCreation(PlatformError),

    #[error("user {tag} is unreachable: {source}")]
    UserUnreachable { tag: String, source: PlatformError },

    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}

impl RelayError {
    /// Get a static error code string for log labelling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "empty_message",
            Self::BotTarget(_) => "bot_target",
            Self::UnknownUser(_) => "unknown_user",
            Self::NoRelayChannel => "no_relay_channel",
            Self::RelayChannelUnavailable(_) => "relay_channel_unavailable",
            Self::InvalidRelayChannel(_) => "invalid_relay_channel",
            Self::ThreadCreation(_) => "thread_creation",
            Self::UserUnreachable { .. } => "user_unreachable",
            Self::Platform(_) => "platform_error",
        }
    }

    /// Reply text shown to the staff member.
    pub fn to_reply(&self) -> String {
        match self {
            Self::EmptyMessage => "❌ The message must not be empty.".to_string(),
            Self::BotTarget(_) => "❌ You cannot DM a bot.".to_string(),
            Self::UnknownUser(id) => format!("❌ Could not find user {id}."),
            Self::NoRelayChannel => {
                "❌ No relay channel is configured for this server. Run /setup first.".to_string()
            }
            Self::RelayChannelUnavailable(id) => {
                format!("❌ The relay channel <#{id}> is no longer available. Run /setup again.")
            }
            Self::InvalidRelayChannel(_) => {
                "❌ The relay channel must be a text channel in this server.".to_string()
            }
            Self::ThreadCreation(_) => "❌ Could not create a relay thread.".to_string(),
            Self::UserUnreachable { tag, .. } => format!(
                "❌ Could not send DM to {tag}. They may have DMs disabled or have blocked the bot."
            ),
            Self::Platform(_) => "⚠️ An error occurred while executing this command.".to_string(),
        }
    }
}
