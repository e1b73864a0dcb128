//! Inbound platform events.
//!
//! The router sees two shapes: a posted message (direct, public or thread,
//! told apart by the channel kind) and an explicit staff command.

use crate::platform::{Author, Channel, ChannelId, GuildId, MessageRef, UserId};
use serde::{Deserialize, Serialize};

/// A message posted by someone other than this bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub message: MessageRef,
    pub author: Author,
    pub channel: Channel,
    pub content: String,
    /// Author holds the moderate-members permission in the guild.
    pub author_is_moderator: bool,
}

impl IncomingMessage {
    pub fn guild(&self) -> Option<GuildId> {
        self.channel.guild
    }
}

/// Staff command issued inside a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInvocation {
    pub guild: GuildId,
    pub invoker: Author,
    pub command: StaffCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum StaffCommand {
    /// Open a relay session with `user`, sending `message` as the first DM.
    Open { user: UserId, message: String },
    /// End the relay session with `user`.
    End { user: UserId },
    /// Set the channel that hosts relay threads.
    Setup { channel: ChannelId },
    /// Toggle AutoMod for the guild.
    Automod { enabled: bool },
}

impl StaffCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Open { .. } => "open",
            Self::End { .. } => "end",
            Self::Setup { .. } => "setup",
            Self::Automod { .. } => "automod",
        }
    }
}

/// Ephemeral reply shown only to the staff member who ran a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub success: bool,
    pub content: String,
}

impl CommandReply {
    pub fn ok(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: content.into(),
        }
    }

    pub fn failed(content: impl Into<String>) -> Self {
        Self {
            success: false,
            content: content.into(),
        }
    }
}
