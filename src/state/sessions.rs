//! Session directory.
//!
//! Owns the bijective relay mapping between (guild, external user) and
//! (guild, staff thread). Both directions live in the guild's flat
//! `dmThreads` map and are always written and removed together.

use super::DocumentStore;
use crate::persistence::Document;
use crate::platform::{ChannelId, GuildId, UserId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One open relay conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Session {
    pub guild: GuildId,
    pub user: UserId,
    pub thread: ChannelId,
}

pub struct SessionDirectory {
    store: Arc<DocumentStore>,
}

impl SessionDirectory {
    /// Build the directory over a loaded document.
    ///
    /// Entries without a matching mirror are dropped (and the repaired
    /// document persisted) so the bijection holds from the first call.
    pub async fn init(store: Arc<DocumentStore>) -> Self {
        let dropped = store.apply(repair);
        if dropped > 0 {
            warn!(dropped, "Dropped relay entries without a mirror entry");
            store.persist().await;
        }
        Self { store }
    }

    /// Open a session, replacing any session held by `user` or `thread` in
    /// this guild. Returns the replaced sessions.
    pub async fn open(&self, guild: GuildId, user: UserId, thread: ChannelId) -> Vec<Session> {
        let replaced = self.store.apply(|doc| {
            let map = &mut doc.guilds.entry(guild.to_string()).or_default().dm_threads;
            let user_key = user.to_string();
            let thread_key = thread.to_string();
            let mut replaced = Vec::new();

            if let Some(old_thread) = unlink(map, &user_key)
                && old_thread != thread_key
                && let Ok(old_thread) = old_thread.parse()
            {
                replaced.push(Session {
                    guild,
                    user,
                    thread: old_thread,
                });
            }
            if let Some(old_user) = unlink(map, &thread_key)
                && old_user != user_key
                && let Ok(old_user) = old_user.parse()
            {
                replaced.push(Session {
                    guild,
                    user: old_user,
                    thread,
                });
            }

            map.insert(user_key.clone(), thread_key.clone());
            map.insert(thread_key, user_key);
            replaced
        });

        for old in &replaced {
            info!(guild = %guild, user = %old.user, thread = %old.thread, "Relay session replaced");
        }
        debug!(guild = %guild, user = %user, thread = %thread, "Relay session opened");
        self.store.persist().await;
        replaced
    }

    /// Thread mapped to `user` in `guild`.
    pub fn find_by_user(&self, guild: GuildId, user: UserId) -> Option<ChannelId> {
        self.store
            .read(|doc| mirrored(doc, guild, &user.to_string()))
            .and_then(|t| t.parse().ok())
    }

    /// User mapped to `thread` in `guild`.
    pub fn find_by_thread(&self, guild: GuildId, thread: ChannelId) -> Option<UserId> {
        self.store
            .read(|doc| mirrored(doc, guild, &thread.to_string()))
            .and_then(|u| u.parse().ok())
    }

    /// Sessions held by `user` across all guilds, ascending guild id.
    ///
    /// Direct messages carry no guild, so the router resolves them here.
    pub fn sessions_for_user(&self, user: UserId) -> Vec<Session> {
        let user_key = user.to_string();
        let mut found: Vec<Session> = self.store.read(|doc| {
            doc.guilds
                .iter()
                .filter_map(|(guild, entry)| {
                    let thread = entry.dm_threads.get(&user_key)?;
                    if entry.dm_threads.get(thread) != Some(&user_key) {
                        return None;
                    }
                    Some(Session {
                        guild: guild.parse().ok()?,
                        user,
                        thread: thread.parse().ok()?,
                    })
                })
                .collect()
        });
        found.sort_by_key(|s| s.guild);
        found
    }

    /// Close the session of `user` in `guild`. Returns `false` (and writes
    /// nothing) when there was none.
    pub async fn close(&self, guild: GuildId, user: UserId) -> bool {
        self.remove_pair(guild, user, None).await
    }

    /// Close `session` only if its user is still mapped to its thread.
    ///
    /// A session reopened on another thread in the meantime is left alone.
    pub async fn close_if(&self, session: &Session) -> bool {
        self.remove_pair(session.guild, session.user, Some(session.thread))
            .await
    }

    async fn remove_pair(&self, guild: GuildId, user: UserId, expected: Option<ChannelId>) -> bool {
        let removed = self.store.apply(|doc| {
            let map = &mut doc.guilds.get_mut(&guild.to_string())?.dm_threads;
            let user_key = user.to_string();
            let thread = map.get(&user_key)?.clone();
            if map.get(&thread) != Some(&user_key) {
                return None;
            }
            if let Some(expected) = expected
                && thread != expected.to_string()
            {
                return None;
            }
            map.remove(&user_key);
            map.remove(&thread);
            Some(thread)
        });

        match removed {
            Some(thread) => {
                debug!(guild = %guild, user = %user, thread = %thread, "Relay session closed");
                self.store.persist().await;
                true
            }
            None => false,
        }
    }
}

/// Value at `key` if its mirror points back at `key`.
fn mirrored(doc: &Document, guild: GuildId, key: &str) -> Option<String> {
    let map = &doc.guilds.get(&guild.to_string())?.dm_threads;
    let other = map.get(key)?;
    (map.get(other).map(String::as_str) == Some(key)).then(|| other.clone())
}

/// Remove `key` and, if it is mirrored, its partner. Returns the partner.
fn unlink(map: &mut BTreeMap<String, String>, key: &str) -> Option<String> {
    let other = map.remove(key)?;
    if map.get(&other).map(String::as_str) == Some(key) {
        map.remove(&other);
    }
    Some(other)
}

/// Drop every entry whose mirror is missing or points elsewhere.
fn repair(doc: &mut Document) -> usize {
    let mut dropped = 0;
    for entry in doc.guilds.values_mut() {
        let snapshot = entry.dm_threads.clone();
        entry.dm_threads.retain(|k, v| {
            let keep = snapshot.get(v) == Some(k);
            if !keep {
                dropped += 1;
            }
            keep
        });
    }
    dropped
}
