//! Event routing.
//!
//! The [`Router`] is the single entry point for platform events. Posted
//! messages are told apart by channel kind:
//! - direct channel: external user writing to the relay
//! - relay thread: staff reply
//! - anything else in a guild: public message, evaluated by AutoMod
//!
//! Staff commands produce an ephemeral [`CommandReply`]. No port failure
//! escapes the router.

mod commands;
mod messages;

use std::sync::Arc;
use tracing::Instrument;

use crate::config::Config;
use crate::events::{CommandInvocation, CommandReply, IncomingMessage};
use crate::persistence::{PersistError, Persistence};
use crate::platform::{Messenger, Moderator};
use crate::relay::{InboundOutcome, RelayDispatcher, ReplyOutcome};
use crate::security::{AutoMod, AutoModOutcome};
use crate::state::{DocumentStore, GuildSettings, SessionDirectory};
use crate::telemetry::spans;

/// Where a posted message ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// Authored by a bot.
    Ignored,
    Inbound(InboundOutcome),
    StaffReply(ReplyOutcome),
    AutoMod(AutoModOutcome),
}

pub struct Router {
    relay: RelayDispatcher,
    automod: AutoMod,
    settings: Arc<GuildSettings>,
}

impl Router {
    /// Load persisted state and wire every component over the given ports.
    pub async fn init(
        config: &Config,
        persistence: Arc<dyn Persistence>,
        messenger: Arc<dyn Messenger>,
        moderator: Arc<dyn Moderator>,
    ) -> Result<Self, PersistError> {
        let store = Arc::new(DocumentStore::init(persistence).await?);
        let directory = Arc::new(SessionDirectory::init(store.clone()).await);
        let settings = Arc::new(GuildSettings::new(store));
        let relay = RelayDispatcher::new(
            directory,
            settings.clone(),
            messenger.clone(),
            config.relay.clone(),
        );
        let automod = AutoMod::new(
            config.automod.clone(),
            settings.clone(),
            messenger,
            moderator,
            config.bot.name.clone(),
        );
        Ok(Self {
            relay,
            automod,
            settings,
        })
    }

    pub fn relay(&self) -> &RelayDispatcher {
        &self.relay
    }

    pub fn automod(&self) -> &AutoMod {
        &self.automod
    }

    pub fn settings(&self) -> &GuildSettings {
        &self.settings
    }

    pub async fn handle_message(&self, msg: IncomingMessage) -> Routed {
        let guild = msg.guild().map(|g| g.to_string());
        let span = spans::event(
            messages::kind(&msg),
            &msg.author.id.to_string(),
            guild.as_deref(),
        );
        self.route_message(&msg).instrument(span).await
    }

    pub async fn handle_command(&self, invocation: CommandInvocation) -> CommandReply {
        let span = spans::command(
            invocation.command.name(),
            &invocation.guild.to_string(),
            &invocation.invoker.tag,
        );
        self.run_command(invocation).instrument(span).await
    }
}
