//! Per-guild settings stored next to the relay map.

use super::DocumentStore;
use crate::persistence::AutoModEntry;
use crate::platform::{ChannelId, GuildId};
use std::sync::Arc;
use tracing::info;

pub struct GuildSettings {
    store: Arc<DocumentStore>,
}

impl GuildSettings {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Channel under which staff relay threads are created.
    pub fn relay_channel(&self, guild: GuildId) -> Option<ChannelId> {
        self.store.read(|doc| {
            doc.guilds
                .get(&guild.to_string())?
                .log_channel
                .as_deref()?
                .parse()
                .ok()
        })
    }

    pub async fn set_relay_channel(&self, guild: GuildId, channel: ChannelId) {
        self.store.apply(|doc| {
            doc.guilds.entry(guild.to_string()).or_default().log_channel = Some(channel.to_string());
        });
        info!(guild = %guild, channel = %channel, "Relay channel configured");
        self.store.persist().await;
    }

    /// Explicit AutoMod switch for the guild, if one was ever set.
    pub fn automod_enabled(&self, guild: GuildId) -> Option<bool> {
        self.store.read(|doc| {
            doc.guilds
                .get(&guild.to_string())?
                .auto_mod
                .map(|a| a.enabled)
        })
    }

    pub async fn set_automod(&self, guild: GuildId, enabled: bool) {
        self.store.apply(|doc| {
            doc.guilds.entry(guild.to_string()).or_default().auto_mod =
                Some(AutoModEntry { enabled });
        });
        info!(guild = %guild, enabled, "AutoMod toggled");
        self.store.persist().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[tokio::test]
    async fn test_settings_persist() {
        let backend = Arc::new(MemoryStore::new());
        let store = Arc::new(DocumentStore::init(backend.clone()).await.unwrap());
        let settings = GuildSettings::new(store);
        let guild = GuildId(5);

        assert_eq!(settings.relay_channel(guild), None);
        assert_eq!(settings.automod_enabled(guild), None);

        settings.set_relay_channel(guild, ChannelId(77)).await;
        settings.set_automod(guild, true).await;

        assert_eq!(settings.relay_channel(guild), Some(ChannelId(77)));
        assert_eq!(settings.automod_enabled(guild), Some(true));

        let saved = backend.snapshot();
        assert_eq!(saved.guilds["5"].log_channel.as_deref(), Some("77"));
        assert_eq!(saved.guilds["5"].auto_mod, Some(AutoModEntry { enabled: true }));
    }
}
