//! Relay dispatcher.
//!
//! Drives the per-(guild, user) relay state machine:
//!
//! ```text
//! NoSession --open--> Active --end / dead thread--> Ended
//!     ^                                               |
//!     +-------------------- open ---------------------+
//! ```
//!
//! The session directory is the source of truth for `Active`; `Ended` is
//! remembered in memory only so callers can tell a closed conversation from
//! one that never existed.

use dashmap::DashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::format;
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::events::IncomingMessage;
use crate::platform::{
    Author, Channel, ChannelId, ChannelKind, GuildId, Messenger, PlatformError, UserId,
};
use crate::state::{GuildSettings, Session, SessionDirectory};

/// Relay state of one (guild, user) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    Active(ChannelId),
    Ended,
}

/// Result of a successful open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opened {
    pub session: Session,
    pub target: Author,
    /// Sessions displaced by this one.
    pub replaced: Vec<Session>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOutcome {
    Ended {
        session: Session,
        /// The user received the closing DM.
        notified: bool,
        /// The thread was archived.
        archived: bool,
    },
    NoActiveSession,
}

/// What happened to a direct message from an external user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundOutcome {
    Forwarded(Session),
    /// No session anywhere; the user got the standing instruction.
    NoSession,
    /// The thread was gone; the session was closed.
    CleanedUp(Session),
    /// The thread was gone but the session had already been reopened on a
    /// new thread, which is left untouched.
    Superseded(Session),
}

/// What happened to a staff message posted in a relay thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    Delivered(Session),
    /// DM failed; a warning was posted in the thread.
    Undelivered(Session),
    /// The author lacks moderator rights; nothing was relayed.
    NotStaff(Session),
}

pub struct RelayDispatcher {
    directory: Arc<SessionDirectory>,
    settings: Arc<GuildSettings>,
    messenger: Arc<dyn Messenger>,
    config: RelayConfig,
    ended: DashSet<(GuildId, UserId)>,
}

impl RelayDispatcher {
    pub fn new(
        directory: Arc<SessionDirectory>,
        settings: Arc<GuildSettings>,
        messenger: Arc<dyn Messenger>,
        config: RelayConfig,
    ) -> Self {
        Self {
            directory,
            settings,
            messenger,
            config,
            ended: DashSet::new(),
        }
    }

    pub fn directory(&self) -> &SessionDirectory {
        &self.directory
    }

    pub fn state(&self, guild: GuildId, user: UserId) -> SessionState {
        if let Some(thread) = self.directory.find_by_user(guild, user) {
            SessionState::Active(thread)
        } else if self.ended.contains(&(guild, user)) {
            SessionState::Ended
        } else {
            SessionState::NoSession
        }
    }

    /// Point the guild's relay threads at `channel`.
    ///
    /// The channel must be a text channel of the same guild.
    pub async fn configure(&self, guild: GuildId, channel: ChannelId) -> Result<(), RelayError> {
        let resolved = self.messenger.fetch_channel(channel).await?;
        match resolved {
            Some(c) if c.kind == ChannelKind::Text && c.guild == Some(guild) => {
                self.settings.set_relay_channel(guild, channel).await;
                Ok(())
            }
            _ => Err(RelayError::InvalidRelayChannel(channel)),
        }
    }

    /// Open a session with `user` on behalf of `staff`.
    ///
    /// The opening DM goes out before the thread is created, so a user who
    /// cannot be reached leaves no thread and no session behind.
    pub async fn open(
        &self,
        guild: GuildId,
        staff: &Author,
        user: UserId,
        message: &str,
    ) -> Result<Opened, RelayError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(RelayError::EmptyMessage);
        }

        let target = self
            .messenger
            .fetch_user(user)
            .await?
            .ok_or(RelayError::UnknownUser(user))?;
        if target.bot {
            return Err(RelayError::BotTarget(target.tag));
        }

        let container_id = self
            .settings
            .relay_channel(guild)
            .ok_or(RelayError::NoRelayChannel)?;
        let container = self
            .messenger
            .fetch_channel(container_id)
            .await?
            .ok_or(RelayError::RelayChannelUnavailable(container_id))?;

        if let Err(source) = self.send_direct(user, &format::opening_dm(message)).await {
            warn!(
                guild = %guild,
                user = %user,
                error = %source,
                code = source.error_code(),
                "Opening DM failed, no session opened"
            );
            return Err(RelayError::UserUnreachable {
                tag: target.tag,
                source,
            });
        }

        let thread = match self
            .messenger
            .create_thread(
                &container,
                &format::thread_name(&self.config.thread_prefix, &target),
            )
            .await
        {
            Ok(thread) => thread,
            Err(e) => {
                warn!(guild = %guild, user = %user, error = %e, code = e.error_code(), "Relay thread creation failed after opening DM");
                return Err(RelayError::ThreadCreation(e));
            }
        };
        self.post(&thread, &format::session_header(staff, &target))
            .await;
        self.post(&thread, &format::staff_opening(staff, message))
            .await;

        let replaced = self.directory.open(guild, user, thread.id).await;
        for old in &replaced {
            self.ended.insert((old.guild, old.user));
            if let Ok(Some(old_thread)) = self.messenger.fetch_channel(old.thread).await {
                self.post(&old_thread, format::replaced()).await;
            }
        }
        self.ended.remove(&(guild, user));

        info!(
            guild = %guild,
            user = %user,
            thread = %thread.id,
            staff = %staff.tag,
            "Relay session opened"
        );
        Ok(Opened {
            session: Session {
                guild,
                user,
                thread: thread.id,
            },
            target,
            replaced,
        })
    }

    /// Handle a direct message from an external user.
    pub async fn forward_from_user(&self, msg: &IncomingMessage) -> InboundOutcome {
        let user = msg.author.id;
        let Some(session) = self.directory.sessions_for_user(user).into_iter().next() else {
            if let Err(e) = self
                .messenger
                .send_message(&msg.channel, &self.config.no_session_notice)
                .await
            {
                warn!(user = %user, error = %e, "Failed to send no-session notice");
            }
            return InboundOutcome::NoSession;
        };

        let delivered = match self.messenger.fetch_channel(session.thread).await {
            Ok(Some(thread)) => self
                .messenger
                .send_message(&thread, &format::forwarded(&msg.author, &msg.content))
                .await
                .map(|_| ()),
            Ok(None) => Err(PlatformError::UnknownChannel(session.thread)),
            Err(e) => Err(e),
        };

        match delivered {
            Ok(()) => {
                self.acknowledge(msg, &self.config.inbound_marker).await;
                debug!(guild = %session.guild, user = %user, thread = %session.thread, "Forwarded user message");
                InboundOutcome::Forwarded(session)
            }
            Err(e) => {
                if !self.directory.close_if(&session).await {
                    debug!(
                        guild = %session.guild,
                        user = %user,
                        thread = %session.thread,
                        "Session moved to another thread, skipping cleanup"
                    );
                    return InboundOutcome::Superseded(session);
                }
                self.ended.insert((session.guild, user));
                info!(
                    guild = %session.guild,
                    user = %user,
                    thread = %session.thread,
                    error = %e,
                    "Cleaned up stale thread reference"
                );
                InboundOutcome::CleanedUp(session)
            }
        }
    }

    /// Handle a staff message posted in a thread. `None` when the thread is
    /// not a relay thread.
    pub async fn forward_from_staff(&self, msg: &IncomingMessage) -> Option<ReplyOutcome> {
        let guild = msg.guild()?;
        let user = self.directory.find_by_thread(guild, msg.channel.id)?;
        let session = Session {
            guild,
            user,
            thread: msg.channel.id,
        };
        if !msg.author_is_moderator {
            debug!(guild = %guild, user = %user, author = %msg.author.id, "Ignoring relay thread message from non-moderator");
            return Some(ReplyOutcome::NotStaff(session));
        }

        match self
            .send_direct(user, &format::staff_reply(&msg.author, &msg.content))
            .await
        {
            Ok(()) => {
                self.acknowledge(msg, &self.config.outbound_marker).await;
                debug!(guild = %guild, user = %user, staff = %msg.author.tag, "Delivered staff reply");
                Some(ReplyOutcome::Delivered(session))
            }
            Err(e) => {
                warn!(guild = %guild, user = %user, error = %e, code = e.error_code(), "Staff reply undeliverable");
                self.post(&msg.channel, &format::undeliverable(user)).await;
                Some(ReplyOutcome::Undelivered(session))
            }
        }
    }

    /// End the session with `user`.
    pub async fn end(&self, guild: GuildId, staff: &Author, user: UserId) -> EndOutcome {
        let Some(thread_id) = self.directory.find_by_user(guild, user) else {
            return EndOutcome::NoActiveSession;
        };
        let thread = match self.messenger.fetch_channel(thread_id).await {
            Ok(found) => found,
            Err(e) => {
                warn!(thread = %thread_id, error = %e, "Failed to resolve relay thread");
                None
            }
        };

        let notified = match self.send_direct(user, format::ended_dm()).await {
            Ok(()) => true,
            Err(e) => {
                warn!(guild = %guild, user = %user, error = %e, "Failed to notify user of session end");
                if let Some(thread) = &thread {
                    self.post(thread, &format::end_notify_failed(user)).await;
                }
                false
            }
        };

        let mut archived = false;
        if let Some(thread) = thread.filter(|t| t.supports_archive()) {
            self.post(&thread, &format::ended_notice(staff)).await;
            match self.messenger.archive_thread(&thread).await {
                Ok(()) => archived = true,
                Err(e) => warn!(thread = %thread.id, error = %e, "Failed to archive relay thread"),
            }
        }

        self.directory.close(guild, user).await;
        self.ended.insert((guild, user));
        info!(guild = %guild, user = %user, staff = %staff.tag, notified, archived, "Relay session ended");

        EndOutcome::Ended {
            session: Session {
                guild,
                user,
                thread: thread_id,
            },
            notified,
            archived,
        }
    }

    async fn send_direct(&self, user: UserId, content: &str) -> Result<(), PlatformError> {
        let dm = self.messenger.direct_channel(user).await?;
        self.messenger.send_message(&dm, content).await?;
        Ok(())
    }

    /// Post into a channel, logging failures.
    async fn post(&self, channel: &Channel, content: &str) {
        if let Err(e) = self.messenger.send_message(channel, content).await {
            warn!(channel = %channel.id, error = %e, "Failed to post relay message");
        }
    }

    async fn acknowledge(&self, msg: &IncomingMessage, marker: &str) {
        if let Err(e) = self.messenger.react(&msg.message, marker).await {
            debug!(message = %msg.message.id, error = %e, "Failed to add acknowledgement reaction");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::platform::memory::MemoryPlatform;
    use crate::state::DocumentStore;

    const G: GuildId = GuildId(1);

    struct Fixture {
        platform: Arc<MemoryPlatform>,
        backend: Arc<MemoryStore>,
        relay: Arc<RelayDispatcher>,
        staff: Author,
    }

    async fn fixture() -> Fixture {
        let platform = Arc::new(MemoryPlatform::new());
        fixture_over(platform.clone(), platform).await
    }

    async fn fixture_over(platform: Arc<MemoryPlatform>, messenger: Arc<dyn Messenger>) -> Fixture {
        let backend = Arc::new(MemoryStore::new());
        let store = Arc::new(DocumentStore::init(backend.clone()).await.unwrap());
        let directory = Arc::new(SessionDirectory::init(store.clone()).await);
        let settings = Arc::new(GuildSettings::new(store));
        let relay = Arc::new(RelayDispatcher::new(
            directory,
            settings,
            messenger,
            RelayConfig::default(),
        ));
        let staff = platform.add_user("mod#0001", false);
        let relay_channel = platform.add_text_channel(G, "modmail");
        relay.configure(G, relay_channel.id).await.unwrap();
        Fixture {
            platform,
            backend,
            relay,
            staff,
        }
    }

    /// Messenger that parks the first lookup of one channel until released.
    struct GatedMessenger {
        inner: Arc<MemoryPlatform>,
        armed: parking_lot::Mutex<Option<ChannelId>>,
        entered: tokio::sync::Notify,
        release: tokio::sync::Notify,
    }

    impl GatedMessenger {
        fn new(inner: Arc<MemoryPlatform>) -> Self {
            Self {
                inner,
                armed: parking_lot::Mutex::new(None),
                entered: tokio::sync::Notify::new(),
                release: tokio::sync::Notify::new(),
            }
        }

        fn arm(&self, channel: ChannelId) {
            *self.armed.lock() = Some(channel);
        }
    }

    #[async_trait::async_trait]
    impl Messenger for GatedMessenger {
        async fn send_message(
            &self,
            target: &Channel,
            content: &str,
        ) -> Result<crate::platform::MessageRef, PlatformError> {
            self.inner.send_message(target, content).await
        }

        async fn create_thread(
            &self,
            container: &Channel,
            name: &str,
        ) -> Result<Channel, PlatformError> {
            self.inner.create_thread(container, name).await
        }

        async fn archive_thread(&self, thread: &Channel) -> Result<(), PlatformError> {
            self.inner.archive_thread(thread).await
        }

        async fn fetch_channel(&self, id: ChannelId) -> Result<Option<Channel>, PlatformError> {
            let hold = {
                let mut armed = self.armed.lock();
                if *armed == Some(id) {
                    armed.take();
                    true
                } else {
                    false
                }
            };
            if hold {
                self.entered.notify_one();
                self.release.notified().await;
            }
            self.inner.fetch_channel(id).await
        }

        async fn fetch_user(&self, id: UserId) -> Result<Option<Author>, PlatformError> {
            self.inner.fetch_user(id).await
        }

        async fn direct_channel(&self, user: UserId) -> Result<Channel, PlatformError> {
            self.inner.direct_channel(user).await
        }

        async fn react(
            &self,
            message: &crate::platform::MessageRef,
            marker: &str,
        ) -> Result<(), PlatformError> {
            self.inner.react(message, marker).await
        }
    }

    fn dm_from(f: &Fixture, user: &Author, content: &str) -> IncomingMessage {
        let dm = Channel {
            id: ChannelId(9_999),
            kind: ChannelKind::Direct,
            guild: None,
        };
        IncomingMessage {
            message: f.platform.post_incoming(dm.id, user.id, content),
            author: user.clone(),
            channel: dm,
            content: content.to_string(),
            author_is_moderator: false,
        }
    }

    #[tokio::test]
    async fn test_open_creates_thread_and_session() {
        let f = fixture().await;
        let user = f.platform.add_user("alice#0001", false);

        let opened = f.relay.open(G, &f.staff, user.id, "hi there").await.unwrap();
        assert!(opened.replaced.is_empty());
        assert_eq!(f.relay.state(G, user.id), SessionState::Active(opened.session.thread));
        assert_eq!(
            f.platform.channel_name(opened.session.thread).as_deref(),
            Some("dm-alice#0001")
        );

        let thread_log = f.platform.bot_messages(opened.session.thread);
        assert_eq!(thread_log.len(), 2);
        assert!(thread_log[0].contains(&user.id.to_string()));
        assert!(thread_log[1].contains("hi there"));

        let dms = f.platform.direct_messages(user.id);
        assert_eq!(dms.len(), 1);
        assert!(dms[0].contains("hi there"));
    }

    #[tokio::test]
    async fn test_open_refuses_bots_and_unknown_users() {
        let f = fixture().await;
        let bot = f.platform.add_user("helper#0000", true);

        let err = f.relay.open(G, &f.staff, bot.id, "hello").await.unwrap_err();
        assert_eq!(err, RelayError::BotTarget("helper#0000".into()));

        let err = f.relay.open(G, &f.staff, UserId(5), "hello").await.unwrap_err();
        assert_eq!(err, RelayError::UnknownUser(UserId(5)));
        assert!(f.platform.threads_in(G).is_empty());
    }

    #[tokio::test]
    async fn test_open_requires_relay_channel() {
        let f = fixture().await;
        let user = f.platform.add_user("alice#0001", false);
        let err = f
            .relay
            .open(GuildId(2), &f.staff, user.id, "hello")
            .await
            .unwrap_err();
        assert_eq!(err, RelayError::NoRelayChannel);
    }

    #[tokio::test]
    async fn test_open_with_unreachable_user_leaves_nothing_behind() {
        let f = fixture().await;
        let user = f.platform.add_user("carol#0003", false);
        f.platform.block_dms(user.id);
        let saves = f.backend.saves();

        let err = f.relay.open(G, &f.staff, user.id, "hello").await.unwrap_err();
        assert!(matches!(err, RelayError::UserUnreachable { .. }));
        assert_eq!(f.relay.state(G, user.id), SessionState::NoSession);
        assert_eq!(f.backend.saves(), saves);
        assert!(f.platform.threads_in(G).is_empty());
    }

    #[tokio::test]
    async fn test_reopen_replaces_previous_thread() {
        let f = fixture().await;
        let user = f.platform.add_user("alice#0001", false);
        let first = f.relay.open(G, &f.staff, user.id, "one").await.unwrap();
        let second = f.relay.open(G, &f.staff, user.id, "two").await.unwrap();

        assert_eq!(second.replaced, vec![first.session]);
        assert_eq!(
            f.relay.directory().find_by_thread(G, first.session.thread),
            None
        );
        let old_log = f.platform.bot_messages(first.session.thread);
        assert!(old_log.last().is_some_and(|m| m.contains("replaced")));
    }

    #[tokio::test]
    async fn test_inbound_without_session_gets_instruction() {
        let f = fixture().await;
        let user = f.platform.add_user("bob#0002", false);
        let msg = dm_from(&f, &user, "hello?");
        f.platform.insert_channel(msg.channel, "dm-bob");

        assert_eq!(f.relay.forward_from_user(&msg).await, InboundOutcome::NoSession);
        assert_eq!(
            f.platform.bot_messages(msg.channel.id),
            vec![RelayConfig::default().no_session_notice]
        );
    }

    #[tokio::test]
    async fn test_inbound_forwards_and_reacts() {
        let f = fixture().await;
        let user = f.platform.add_user("alice#0001", false);
        let opened = f.relay.open(G, &f.staff, user.id, "hi").await.unwrap();

        let dm = f.platform.direct_channel(user.id).await.unwrap();
        let msg = IncomingMessage {
            message: f.platform.post_incoming(dm.id, user.id, "hello"),
            author: user.clone(),
            channel: dm,
            content: "hello".into(),
            author_is_moderator: false,
        };
        assert_eq!(
            f.relay.forward_from_user(&msg).await,
            InboundOutcome::Forwarded(opened.session)
        );
        let log = f.platform.bot_messages(opened.session.thread);
        assert_eq!(log.last().map(String::as_str), Some("📨 **alice#0001:** hello"));
        assert_eq!(f.platform.reactions(&msg.message), vec!["📬".to_string()]);
    }

    #[tokio::test]
    async fn test_dead_thread_triggers_cleanup() {
        let f = fixture().await;
        let user = f.platform.add_user("alice#0001", false);
        let opened = f.relay.open(G, &f.staff, user.id, "hi").await.unwrap();
        f.platform.delete_channel(opened.session.thread);

        let dm = f.platform.direct_channel(user.id).await.unwrap();
        let msg = IncomingMessage {
            message: f.platform.post_incoming(dm.id, user.id, "anyone?"),
            author: user.clone(),
            channel: dm,
            content: "anyone?".into(),
            author_is_moderator: false,
        };
        assert_eq!(
            f.relay.forward_from_user(&msg).await,
            InboundOutcome::CleanedUp(opened.session)
        );
        assert_eq!(f.relay.state(G, user.id), SessionState::Ended);
        assert_eq!(
            f.relay.directory().find_by_thread(G, opened.session.thread),
            None
        );
        // The user is not told about the cleanup.
        assert_eq!(f.platform.direct_messages(user.id).len(), 1);
    }

    #[tokio::test]
    async fn test_dead_thread_cleanup_spares_reopened_session() {
        let platform = Arc::new(MemoryPlatform::new());
        let gated = Arc::new(GatedMessenger::new(platform.clone()));
        let f = fixture_over(platform, gated.clone()).await;
        let user = f.platform.add_user("alice#0001", false);
        let first = f.relay.open(G, &f.staff, user.id, "one").await.unwrap();

        let dm = f.platform.direct_channel(user.id).await.unwrap();
        let msg = IncomingMessage {
            message: f.platform.post_incoming(dm.id, user.id, "late"),
            author: user.clone(),
            channel: dm,
            content: "late".into(),
            author_is_moderator: false,
        };
        gated.arm(first.session.thread);
        let relay = f.relay.clone();
        let inbound = tokio::spawn(async move { relay.forward_from_user(&msg).await });

        // The inbound lookup of the old thread is parked; staff reopen meanwhile.
        gated.entered.notified().await;
        f.platform.delete_channel(first.session.thread);
        let second = f.relay.open(G, &f.staff, user.id, "two").await.unwrap();
        let saves = f.backend.saves();
        gated.release.notify_one();

        assert_eq!(
            inbound.await.unwrap(),
            InboundOutcome::Superseded(first.session)
        );
        assert_eq!(
            f.relay.state(G, user.id),
            SessionState::Active(second.session.thread)
        );
        assert_eq!(
            f.relay.directory().find_by_thread(G, second.session.thread),
            Some(user.id)
        );
        assert_eq!(f.backend.saves(), saves);
    }

    #[tokio::test]
    async fn test_non_moderator_in_relay_thread_is_not_relayed() {
        let f = fixture().await;
        let user = f.platform.add_user("alice#0001", false);
        let lurker = f.platform.add_user("lurker#0009", false);
        let opened = f.relay.open(G, &f.staff, user.id, "hi").await.unwrap();

        let thread = f
            .platform
            .fetch_channel(opened.session.thread)
            .await
            .unwrap()
            .unwrap();
        let msg = IncomingMessage {
            message: f.platform.post_incoming(thread.id, lurker.id, "psst"),
            author: lurker.clone(),
            channel: thread,
            content: "psst".into(),
            author_is_moderator: false,
        };
        assert_eq!(
            f.relay.forward_from_staff(&msg).await,
            Some(ReplyOutcome::NotStaff(opened.session))
        );
        assert_eq!(f.platform.direct_messages(user.id).len(), 1);
        assert!(f.platform.reactions(&msg.message).is_empty());
    }

    #[tokio::test]
    async fn test_staff_reply_failure_keeps_session() {
        let f = fixture().await;
        let user = f.platform.add_user("alice#0001", false);
        let opened = f.relay.open(G, &f.staff, user.id, "hi").await.unwrap();
        f.platform.block_dms(user.id);

        let thread = f
            .platform
            .fetch_channel(opened.session.thread)
            .await
            .unwrap()
            .unwrap();
        let msg = IncomingMessage {
            message: f.platform.post_incoming(thread.id, f.staff.id, "are you there?"),
            author: f.staff.clone(),
            channel: thread,
            content: "are you there?".into(),
            author_is_moderator: true,
        };
        assert_eq!(
            f.relay.forward_from_staff(&msg).await,
            Some(ReplyOutcome::Undelivered(opened.session))
        );
        assert_eq!(f.relay.state(G, user.id), SessionState::Active(thread.id));
        let log = f.platform.bot_messages(thread.id);
        assert!(log.last().is_some_and(|m| m.starts_with("⚠️")));
    }

    #[tokio::test]
    async fn test_end_archives_and_closes() {
        let f = fixture().await;
        let user = f.platform.add_user("alice#0001", false);
        let opened = f.relay.open(G, &f.staff, user.id, "hi").await.unwrap();

        let outcome = f.relay.end(G, &f.staff, user.id).await;
        assert_eq!(
            outcome,
            EndOutcome::Ended {
                session: opened.session,
                notified: true,
                archived: true,
            }
        );
        assert!(f.platform.is_archived(opened.session.thread));
        assert_eq!(f.relay.state(G, user.id), SessionState::Ended);
        assert_eq!(f.platform.direct_messages(user.id).len(), 2);
    }

    #[tokio::test]
    async fn test_end_without_session_does_not_save() {
        let f = fixture().await;
        let saves = f.backend.saves();
        assert_eq!(
            f.relay.end(G, &f.staff, UserId(77)).await,
            EndOutcome::NoActiveSession
        );
        assert_eq!(f.backend.saves(), saves);
    }

    #[tokio::test]
    async fn test_configure_rejects_foreign_channel() {
        let f = fixture().await;
        let other = f.platform.add_text_channel(GuildId(2), "elsewhere");
        assert_eq!(
            f.relay.configure(G, other.id).await,
            Err(RelayError::InvalidRelayChannel(other.id))
        );
    }
}
