//! Test bot management.
//!
//! Builds a router over [`MemoryPlatform`] with one guild, a staff member,
//! a relay channel and a public channel already in place.

use staffrelay::config::Config;
use staffrelay::events::{CommandInvocation, CommandReply, IncomingMessage, StaffCommand};
use staffrelay::handlers::{Routed, Router};
use staffrelay::persistence::{MemoryStore, Persistence};
use staffrelay::platform::memory::MemoryPlatform;
use staffrelay::platform::{Author, Channel, ChannelId, GuildId, Messenger, MessageRef};
use std::sync::Arc;

pub const GUILD: GuildId = GuildId(1);

/// An in-process bot instance.
#[allow(dead_code)]
pub struct TestBot {
    pub platform: Arc<MemoryPlatform>,
    pub store: Arc<MemoryStore>,
    pub router: Router,
    pub staff: Author,
    pub relay_channel: Channel,
    pub general: Channel,
}

#[allow(dead_code)]
impl TestBot {
    /// Start with default configuration and the relay channel configured.
    pub async fn start() -> Self {
        Self::with_config(Config::default()).await
    }

    pub async fn with_config(config: Config) -> Self {
        Self::with_backend(config, Arc::new(MemoryStore::new())).await
    }

    pub async fn with_backend(config: Config, store: Arc<MemoryStore>) -> Self {
        let platform = Arc::new(MemoryPlatform::new());
        let persistence: Arc<dyn Persistence> = store.clone();
        let router = Router::init(&config, persistence, platform.clone(), platform.clone())
            .await
            .expect("router init");
        let staff = platform.add_user("mod#0001", false);
        let relay_channel = platform.add_text_channel(GUILD, "modmail");
        let general = platform.add_text_channel(GUILD, "general");

        let bot = Self {
            platform,
            store,
            router,
            staff,
            relay_channel,
            general,
        };
        let reply = bot
            .command(StaffCommand::Setup {
                channel: bot.relay_channel.id,
            })
            .await;
        assert!(reply.success, "setup failed: {}", reply.content);
        bot
    }

    /// Register an external user.
    pub fn user(&self, tag: &str) -> Author {
        self.platform.add_user(tag, false)
    }

    /// Run a staff command as the default staff member.
    pub async fn command(&self, command: StaffCommand) -> CommandReply {
        self.router
            .handle_command(CommandInvocation {
                guild: GUILD,
                invoker: self.staff.clone(),
                command,
            })
            .await
    }

    /// `user` writes to the bot privately.
    pub async fn dm(&self, user: &Author, content: &str) -> (MessageRef, Routed) {
        let channel = self
            .platform
            .direct_channel(user.id)
            .await
            .expect("direct channel");
        self.post(channel, user, content, false).await
    }

    /// The default staff member writes in `thread`.
    pub async fn staff_says(&self, thread: ChannelId, content: &str) -> (MessageRef, Routed) {
        let channel = self
            .platform
            .fetch_channel(thread)
            .await
            .expect("fetch thread")
            .expect("thread exists");
        let staff = self.staff.clone();
        self.post(channel, &staff, content, true).await
    }

    /// `author` writes in the public channel.
    pub async fn public(&self, author: &Author, content: &str, moderator: bool) -> Routed {
        self.post(self.general, author, content, moderator).await.1
    }

    async fn post(
        &self,
        channel: Channel,
        author: &Author,
        content: &str,
        moderator: bool,
    ) -> (MessageRef, Routed) {
        let message = self.platform.post_incoming(channel.id, author.id, content);
        let routed = self
            .router
            .handle_message(IncomingMessage {
                message,
                author: author.clone(),
                channel,
                content: content.to_string(),
                author_is_moderator: moderator,
            })
            .await;
        (message, routed)
    }
}
