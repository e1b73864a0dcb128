//! Persisted server document.
//!
//! The whole bot state that survives a restart lives in one JSON document:
//!
//! ```text
//! { "guilds": { "<guildId>": { "dmThreads": { "<userId>": "<threadId>",
//!                                             "<threadId>": "<userId>" },
//!                              "logChannel": "<channelId>",
//!                              "autoMod": { "enabled": true } } } }
//! ```
//!
//! Both relay directions sit side by side in the same flat `dmThreads` map.
//! Snowflakes are globally unique, so a user id never collides with a thread
//! id; callers pick the direction by the kind of id they look up.
//!
//! Every mutation rewrites the full document through a [`Persistence`] port.

pub mod json;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Root of the persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Per-guild state keyed by the guild id as a decimal string.
    #[serde(default)]
    pub guilds: BTreeMap<String, GuildEntry>,
}

/// Per-guild slice of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildEntry {
    /// Flat bidirectional relay map (user -> thread and thread -> user).
    #[serde(default)]
    pub dm_threads: BTreeMap<String, String>,
    /// Container channel for staff relay threads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_mod: Option<AutoModEntry>,
    /// Keys written by other bot features; carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoModEntry {
    #[serde(default)]
    pub enabled: bool,
}

/// Persistence port: load and overwrite the full document.
#[async_trait]
pub trait Persistence: Send + Sync {
    async fn load(&self) -> Result<Document, PersistError>;

    async fn save(&self, document: &Document) -> Result<(), PersistError>;
}
