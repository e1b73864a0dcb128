//! In-process platform.
//!
//! Keeps guild channels, threads, DM channels and users in memory and records
//! every outbound call. Backs the gateway driver and the test harness.

use super::{
    Author, Channel, ChannelId, ChannelKind, GuildId, MessageId, MessageRef, Messenger, Moderator,
    PlatformError, UserId,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// First id handed out by the allocator. Keeps generated ids visually distinct.
const FIRST_ID: u64 = 1_000;

#[derive(Debug)]
struct ChannelEntry {
    channel: Channel,
    name: String,
    archived: bool,
    /// Direct channels remember their peer.
    peer: Option<UserId>,
    messages: Vec<MessageId>,
}

#[derive(Debug, Clone)]
pub struct PostedMessage {
    pub id: MessageId,
    pub channel: ChannelId,
    /// `None` when posted by the bot itself.
    pub author: Option<UserId>,
    pub content: String,
    pub reactions: Vec<String>,
}

/// Applied member timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutRecord {
    pub guild: GuildId,
    pub user: UserId,
    pub duration: Duration,
    pub reason: String,
}

#[derive(Debug, Default)]
struct Inner {
    channels: HashMap<ChannelId, ChannelEntry>,
    users: HashMap<UserId, Author>,
    dm_blocked: HashSet<UserId>,
    direct: HashMap<UserId, ChannelId>,
    messages: HashMap<MessageId, PostedMessage>,
    deleted: Vec<MessageRef>,
    timeouts: Vec<TimeoutRecord>,
}

/// In-memory implementation of [`Messenger`] and [`Moderator`].
#[derive(Debug)]
pub struct MemoryPlatform {
    next_id: AtomicU64,
    inner: Mutex<Inner>,
}

impl Default for MemoryPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(FIRST_ID),
            inner: Mutex::new(Inner::default()),
        }
    }

    fn allocate(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    // ------------------------------------------------------------------
    // World setup
    // ------------------------------------------------------------------

    /// Register a user. Returns the author handle.
    pub fn add_user(&self, tag: &str, bot: bool) -> Author {
        let author = Author {
            id: UserId(self.allocate()),
            tag: tag.to_string(),
            bot,
        };
        self.insert_user(author.clone());
        author
    }

    /// Register a user with a known id (used when replaying gateway events).
    pub fn insert_user(&self, author: Author) {
        self.inner.lock().users.insert(author.id, author);
    }

    /// Create a plain text channel in `guild`.
    pub fn add_text_channel(&self, guild: GuildId, name: &str) -> Channel {
        let channel = Channel {
            id: ChannelId(self.allocate()),
            kind: ChannelKind::Text,
            guild: Some(guild),
        };
        self.insert_channel(channel, name);
        channel
    }

    /// Register a channel with a known id. An already known channel keeps
    /// its state and history.
    pub fn insert_channel(&self, channel: Channel, name: &str) {
        self.inner
            .lock()
            .channels
            .entry(channel.id)
            .or_insert_with(|| ChannelEntry {
                channel,
                name: name.to_string(),
                archived: false,
                peer: None,
                messages: Vec::new(),
            });
    }

    /// Delete a channel out of band, as a staff member would in the client.
    pub fn delete_channel(&self, id: ChannelId) -> bool {
        self.inner.lock().channels.remove(&id).is_some()
    }

    /// Make every DM to `user` fail with [`PlatformError::Forbidden`].
    pub fn block_dms(&self, user: UserId) {
        self.inner.lock().dm_blocked.insert(user);
    }

    /// Record a message authored by a user (an inbound event) so it can be
    /// reacted to or deleted later.
    pub fn post_incoming(&self, channel: ChannelId, author: UserId, content: &str) -> MessageRef {
        let id = MessageId(self.allocate());
        let mut inner = self.inner.lock();
        if let Some(entry) = inner.channels.get_mut(&channel) {
            entry.messages.push(id);
        }
        inner.messages.insert(
            id,
            PostedMessage {
                id,
                channel,
                author: Some(author),
                content: content.to_string(),
                reactions: Vec::new(),
            },
        );
        MessageRef { channel, id }
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Messages the bot posted into `channel`, oldest first.
    pub fn bot_messages(&self, channel: ChannelId) -> Vec<String> {
        let inner = self.inner.lock();
        let Some(entry) = inner.channels.get(&channel) else {
            return Vec::new();
        };
        entry
            .messages
            .iter()
            .filter_map(|id| inner.messages.get(id))
            .filter(|m| m.author.is_none())
            .map(|m| m.content.clone())
            .collect()
    }

    /// Direct messages the bot sent to `user`, oldest first.
    pub fn direct_messages(&self, user: UserId) -> Vec<String> {
        let channel = self.inner.lock().direct.get(&user).copied();
        channel.map(|c| self.bot_messages(c)).unwrap_or_default()
    }

    /// Reactions added to a message.
    pub fn reactions(&self, message: &MessageRef) -> Vec<String> {
        self.inner
            .lock()
            .messages
            .get(&message.id)
            .map(|m| m.reactions.clone())
            .unwrap_or_default()
    }

    /// Threads created in `guild`, oldest first.
    pub fn threads_in(&self, guild: GuildId) -> Vec<Channel> {
        let inner = self.inner.lock();
        let mut threads: Vec<Channel> = inner
            .channels
            .values()
            .filter(|e| e.channel.is_thread() && e.channel.guild == Some(guild))
            .map(|e| e.channel)
            .collect();
        threads.sort_by_key(|c| c.id);
        threads
    }

    pub fn channel_name(&self, id: ChannelId) -> Option<String> {
        self.inner.lock().channels.get(&id).map(|e| e.name.clone())
    }

    pub fn is_archived(&self, id: ChannelId) -> bool {
        self.inner
            .lock()
            .channels
            .get(&id)
            .is_some_and(|e| e.archived)
    }

    pub fn deleted_messages(&self) -> Vec<MessageRef> {
        self.inner.lock().deleted.clone()
    }

    pub fn timeouts(&self) -> Vec<TimeoutRecord> {
        self.inner.lock().timeouts.clone()
    }

    fn post(&self, inner: &mut Inner, channel: ChannelId, content: &str) -> MessageRef {
        let id = MessageId(self.allocate());
        if let Some(entry) = inner.channels.get_mut(&channel) {
            entry.messages.push(id);
        }
        inner.messages.insert(
            id,
            PostedMessage {
                id,
                channel,
                author: None,
                content: content.to_string(),
                reactions: Vec::new(),
            },
        );
        MessageRef { channel, id }
    }
}

#[async_trait]
impl Messenger for MemoryPlatform {
    async fn send_message(
        &self,
        target: &Channel,
        content: &str,
    ) -> Result<MessageRef, PlatformError> {
        let mut inner = self.inner.lock();
        let entry = inner
            .channels
            .get(&target.id)
            .ok_or(PlatformError::UnknownChannel(target.id))?;
        if let Some(peer) = entry.peer
            && inner.dm_blocked.contains(&peer)
        {
            return Err(PlatformError::Forbidden(format!(
                "cannot send messages to user {peer}"
            )));
        }
        let posted = self.post(&mut inner, target.id, content);
        debug!(channel = %target.id, message = %posted.id, "message sent");
        Ok(posted)
    }

    async fn create_thread(
        &self,
        container: &Channel,
        name: &str,
    ) -> Result<Channel, PlatformError> {
        if container.kind != ChannelKind::Text {
            return Err(PlatformError::Unsupported(container.kind));
        }
        let mut inner = self.inner.lock();
        if !inner.channels.contains_key(&container.id) {
            return Err(PlatformError::UnknownChannel(container.id));
        }
        let thread = Channel {
            id: ChannelId(self.allocate()),
            kind: ChannelKind::Thread,
            guild: container.guild,
        };
        inner.channels.insert(
            thread.id,
            ChannelEntry {
                channel: thread,
                name: name.to_string(),
                archived: false,
                peer: None,
                messages: Vec::new(),
            },
        );
        debug!(container = %container.id, thread = %thread.id, name, "thread created");
        Ok(thread)
    }

    async fn archive_thread(&self, thread: &Channel) -> Result<(), PlatformError> {
        if !thread.supports_archive() {
            return Err(PlatformError::Unsupported(thread.kind));
        }
        let mut inner = self.inner.lock();
        let entry = inner
            .channels
            .get_mut(&thread.id)
            .ok_or(PlatformError::UnknownChannel(thread.id))?;
        entry.archived = true;
        debug!(thread = %thread.id, "thread archived");
        Ok(())
    }

    async fn fetch_channel(&self, id: ChannelId) -> Result<Option<Channel>, PlatformError> {
        Ok(self.inner.lock().channels.get(&id).map(|e| e.channel))
    }

    async fn fetch_user(&self, id: UserId) -> Result<Option<Author>, PlatformError> {
        Ok(self.inner.lock().users.get(&id).cloned())
    }

    async fn direct_channel(&self, user: UserId) -> Result<Channel, PlatformError> {
        let mut inner = self.inner.lock();
        if !inner.users.contains_key(&user) {
            return Err(PlatformError::UnknownUser(user));
        }
        if let Some(id) = inner.direct.get(&user).copied()
            && let Some(entry) = inner.channels.get(&id)
        {
            return Ok(entry.channel);
        }
        let channel = Channel {
            id: ChannelId(self.allocate()),
            kind: ChannelKind::Direct,
            guild: None,
        };
        inner.channels.insert(
            channel.id,
            ChannelEntry {
                channel,
                name: format!("dm-{user}"),
                archived: false,
                peer: Some(user),
                messages: Vec::new(),
            },
        );
        inner.direct.insert(user, channel.id);
        Ok(channel)
    }

    async fn react(&self, message: &MessageRef, marker: &str) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock();
        if !inner.channels.contains_key(&message.channel) {
            return Err(PlatformError::UnknownChannel(message.channel));
        }
        let posted = inner
            .messages
            .get_mut(&message.id)
            .ok_or(PlatformError::UnknownMessage(message.id))?;
        posted.reactions.push(marker.to_string());
        Ok(())
    }
}

#[async_trait]
impl Moderator for MemoryPlatform {
    async fn delete_message(&self, message: &MessageRef) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock();
        if inner.messages.remove(&message.id).is_none() {
            return Err(PlatformError::UnknownMessage(message.id));
        }
        if let Some(entry) = inner.channels.get_mut(&message.channel) {
            entry.messages.retain(|id| *id != message.id);
        }
        inner.deleted.push(*message);
        debug!(channel = %message.channel, message = %message.id, "message deleted");
        Ok(())
    }

    async fn timeout_member(
        &self,
        guild: GuildId,
        user: UserId,
        duration: Duration,
        reason: &str,
    ) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock();
        if !inner.users.contains_key(&user) {
            return Err(PlatformError::UnknownUser(user));
        }
        inner.timeouts.push(TimeoutRecord {
            guild,
            user,
            duration,
            reason: reason.to_string(),
        });
        debug!(guild = %guild, user = %user, secs = duration.as_secs(), reason, "member timed out");
        Ok(())
    }
}
