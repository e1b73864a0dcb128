//! AutoMod enforcement for public channel messages.
//!
//! Feeds every eligible message into the author's window, classifies the
//! window and, on a positive verdict, deletes the message, times the author
//! out, records an audit event and posts a notice in the channel. Each
//! enforcement step is attempted even when an earlier one failed.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::spam::{SpamClassifier, SpamReason};
use super::window::MessageWindowStore;
use crate::config::AutoModConfig;
use crate::events::IncomingMessage;
use crate::platform::{GuildId, Messenger, Moderator};
use crate::state::GuildSettings;

const TIMEOUT_REASON: &str = "AutoMod: Spam detected";

/// Why a message was not evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not posted in a guild.
    NoGuild,
    /// AutoMod is off for the guild.
    Disabled,
    /// Author is a moderator.
    Exempt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoModOutcome {
    Skipped(SkipReason),
    Clean,
    Actioned(SpamReason),
}

pub struct AutoMod {
    config: AutoModConfig,
    window: MessageWindowStore,
    classifier: SpamClassifier,
    settings: Arc<GuildSettings>,
    messenger: Arc<dyn Messenger>,
    moderator: Arc<dyn Moderator>,
    /// Name recorded as the acting moderator in audit events.
    actor: String,
}

impl AutoMod {
    pub fn new(
        config: AutoModConfig,
        settings: Arc<GuildSettings>,
        messenger: Arc<dyn Messenger>,
        moderator: Arc<dyn Moderator>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            window: MessageWindowStore::new(config.time_window()),
            classifier: SpamClassifier::new(&config),
            config,
            settings,
            messenger,
            moderator,
            actor: actor.into(),
        }
    }

    pub fn window(&self) -> &MessageWindowStore {
        &self.window
    }

    pub fn classifier(&self) -> &SpamClassifier {
        &self.classifier
    }

    /// Whether AutoMod runs for `guild`: the guild's own switch, else the
    /// configured default.
    pub fn enabled_for(&self, guild: GuildId) -> bool {
        self.settings
            .automod_enabled(guild)
            .unwrap_or(self.config.enabled_by_default)
    }

    /// Evaluate one public message posted at `now` (epoch ms).
    pub async fn inspect(&self, msg: &IncomingMessage, now: i64) -> AutoModOutcome {
        let Some(guild) = msg.guild() else {
            return AutoModOutcome::Skipped(SkipReason::NoGuild);
        };
        if !self.enabled_for(guild) {
            return AutoModOutcome::Skipped(SkipReason::Disabled);
        }
        if msg.author_is_moderator {
            return AutoModOutcome::Skipped(SkipReason::Exempt);
        }

        self.window.append(msg.author.id, &msg.content, now);
        let snapshot = self.window.snapshot(msg.author.id, now);
        let report = self.classifier.report(&snapshot, &msg.content);
        if report.excessive_caps || report.excessive_mentions {
            debug!(
                user = %msg.author.id,
                caps = report.excessive_caps,
                mentions = report.excessive_mentions,
                "Message-level AutoMod predicates fired"
            );
        }

        let Some(reason) = report.verdict.reason() else {
            return AutoModOutcome::Clean;
        };
        info!(
            guild = %guild,
            user = %msg.author.id,
            reason = %reason,
            window = snapshot.len(),
            "Spam detected"
        );
        self.enforce(guild, msg).await;
        AutoModOutcome::Actioned(reason)
    }

    async fn enforce(&self, guild: GuildId, msg: &IncomingMessage) {
        if let Err(e) = self.moderator.delete_message(&msg.message).await {
            warn!(error = %e, code = e.error_code(), message = %msg.message.id, "AutoMod failed to delete message");
        }

        match self
            .moderator
            .timeout_member(guild, msg.author.id, self.config.timeout(), TIMEOUT_REASON)
            .await
        {
            Ok(()) => {
                info!(
                    target: "audit",
                    guild = %guild,
                    action = "AUTO_TIMEOUT",
                    moderator = %self.actor,
                    user = %msg.author.tag,
                    reason = "Spam",
                    duration_secs = self.config.timeout_secs,
                    timestamp = %chrono::Utc::now().to_rfc3339(),
                    "Moderation action"
                );
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), user = %msg.author.id, "AutoMod failed to time out member");
            }
        }

        let notice = format!(
            "🚨 **Spam Detected**\n{}, you were timed out for spamming.",
            msg.author.mention()
        );
        if let Err(e) = self.messenger.send_message(&msg.channel, &notice).await {
            warn!(error = %e, channel = %msg.channel.id, "AutoMod failed to post spam notice");
        }
    }
}
