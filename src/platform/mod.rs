//! Chat platform boundary.
//!
//! Everything the core needs from the host platform goes through two ports:
//! - [`Messenger`]: send/create/archive/fetch channel objects and react to messages
//! - [`Moderator`]: one-shot moderation calls (delete, timeout)
//!
//! Identifiers are 64-bit snowflakes. Each kind gets its own newtype so a
//! thread id can never be handed to a lookup that expects a user id.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw snowflake value.
            #[inline]
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map($name)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                $name(raw)
            }
        }
    };
}

snowflake!(
    /// Guild (server) identifier.
    GuildId
);
snowflake!(
    /// User identifier.
    UserId
);
snowflake!(
    /// Channel identifier. Threads and DM channels are channels too.
    ChannelId
);
snowflake!(
    /// Message identifier, unique within the platform.
    MessageId
);

/// Kind of a channel-like target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Plain guild text channel.
    Text,
    /// Thread inside a guild text channel.
    Thread,
    /// Direct message channel with a single user.
    Direct,
}

impl ChannelKind {
    /// Whether the platform knows an "archived" terminal state for this kind.
    #[inline]
    pub fn supports_archive(self) -> bool {
        matches!(self, Self::Thread)
    }
}

/// A resolved channel handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub kind: ChannelKind,
    /// Owning guild; `None` for direct channels.
    #[serde(default)]
    pub guild: Option<GuildId>,
}

impl Channel {
    #[inline]
    pub fn supports_archive(&self) -> bool {
        self.kind.supports_archive()
    }

    #[inline]
    pub fn is_thread(&self) -> bool {
        self.kind == ChannelKind::Thread
    }
}

/// Address of a posted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel: ChannelId,
    pub id: MessageId,
}

/// Message author as seen by the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    /// Human readable handle (e.g. `name#0001`).
    pub tag: String,
    #[serde(default)]
    pub bot: bool,
}

impl Author {
    /// Mention token the platform renders as a user ping.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// Errors surfaced by platform ports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("unknown channel: {0}")]
    UnknownChannel(ChannelId),

    #[error("unknown user: {0}")]
    UnknownUser(UserId),

    #[error("unknown message: {0}")]
    UnknownMessage(MessageId),

    /// The target refuses delivery (DMs disabled, bot blocked, missing access).
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("operation not supported on {0:?} channel")]
    Unsupported(ChannelKind),

    #[error("transport error: {0}")]
    Transport(String),
}

impl PlatformError {
    /// Static label for log fields.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownChannel(_) => "unknown_channel",
            Self::UnknownUser(_) => "unknown_user",
            Self::UnknownMessage(_) => "unknown_message",
            Self::Forbidden(_) => "forbidden",
            Self::Unsupported(_) => "unsupported",
            Self::Transport(_) => "transport",
        }
    }
}

/// Messaging port consumed by the relay core.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Post `content` into `target`.
    async fn send_message(&self, target: &Channel, content: &str)
    -> Result<MessageRef, PlatformError>;

    /// Create a thread named `name` under `container`.
    async fn create_thread(&self, container: &Channel, name: &str)
    -> Result<Channel, PlatformError>;

    /// Archive a thread. Non-archivable kinds yield [`PlatformError::Unsupported`].
    async fn archive_thread(&self, thread: &Channel) -> Result<(), PlatformError>;

    /// Resolve a channel by id. `Ok(None)` when it no longer exists.
    async fn fetch_channel(&self, id: ChannelId) -> Result<Option<Channel>, PlatformError>;

    /// Resolve a user by id. `Ok(None)` when unknown.
    async fn fetch_user(&self, id: UserId) -> Result<Option<Author>, PlatformError>;

    /// Open (or reuse) the direct channel with `user`.
    async fn direct_channel(&self, user: UserId) -> Result<Channel, PlatformError>;

    /// Add a reaction marker to a message.
    async fn react(&self, message: &MessageRef, marker: &str) -> Result<(), PlatformError>;
}

/// Moderation port. Each call is a one-shot platform action with no state here.
#[async_trait]
pub trait Moderator: Send + Sync {
    async fn delete_message(&self, message: &MessageRef) -> Result<(), PlatformError>;

    async fn timeout_member(
        &self,
        guild: GuildId,
        user: UserId,
        duration: Duration,
        reason: &str,
    ) -> Result<(), PlatformError>;
}
