//! Per-user sliding message window.
//!
//! Records are pruned lazily whenever a user's window is touched. Every
//! [`CLEANUP_INTERVAL`] appends a full pass drops users whose records have
//! all expired, so users who never post again do not stay resident.
//! Timestamps are epoch milliseconds.

use crate::platform::UserId;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Appends between full cleanup passes.
pub const CLEANUP_INTERVAL: u64 = 256;

/// One retained message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub content: String,
    pub timestamp: i64,
}

/// Window statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStats {
    /// Users with at least one retained record.
    pub tracked_users: usize,
    /// Records retained across all users.
    pub total_messages: usize,
}

#[derive(Debug)]
pub struct MessageWindowStore {
    records: DashMap<UserId, VecDeque<MessageRecord>>,
    window_ms: i64,
    appends: AtomicU64,
}

impl MessageWindowStore {
    pub fn new(window: Duration) -> Self {
        Self {
            records: DashMap::new(),
            window_ms: i64::try_from(window.as_millis()).unwrap_or(i64::MAX),
            appends: AtomicU64::new(0),
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms.unsigned_abs())
    }

    /// Append a record, then evict everything older than `timestamp - window`.
    pub fn append(&self, user: UserId, content: &str, timestamp: i64) {
        {
            let mut history = self.records.entry(user).or_default();
            history.push_back(MessageRecord {
                content: content.to_string(),
                timestamp,
            });
            prune(&mut history, timestamp.saturating_sub(self.window_ms));
        }

        // The entry guard above must be released before a full pass.
        let count = self.appends.fetch_add(1, Ordering::Relaxed) + 1;
        if count % CLEANUP_INTERVAL == 0 {
            self.cleanup(timestamp);
        }
    }

    /// Prune every user relative to `now` and drop users left empty.
    pub fn cleanup(&self, now: i64) {
        let cutoff = now.saturating_sub(self.window_ms);
        let before = self.records.len();
        self.records.retain(|_, history| {
            prune(history, cutoff);
            !history.is_empty()
        });
        let removed = before.saturating_sub(self.records.len());
        if removed > 0 {
            debug!(removed, remaining = self.records.len(), "Dropped idle message windows");
        }
    }

    /// Users currently holding an entry, expired or not.
    pub fn resident_users(&self) -> usize {
        self.records.len()
    }

    /// Current window for `user`, pruned relative to `now`.
    pub fn snapshot(&self, user: UserId, now: i64) -> Vec<MessageRecord> {
        let cutoff = now.saturating_sub(self.window_ms);
        let snapshot = match self.records.get_mut(&user) {
            Some(mut history) => {
                prune(&mut history, cutoff);
                history.iter().cloned().collect()
            }
            None => return Vec::new(),
        };
        self.records.remove_if(&user, |_, history| history.is_empty());
        snapshot
    }

    /// Forget everything retained for `user`.
    pub fn clear(&self, user: UserId) {
        self.records.remove(&user);
    }

    pub fn stats(&self) -> WindowStats {
        let mut stats = WindowStats {
            tracked_users: 0,
            total_messages: 0,
        };
        for entry in self.records.iter() {
            if !entry.is_empty() {
                stats.tracked_users += 1;
                stats.total_messages += entry.len();
            }
        }
        stats
    }
}

/// Drop records older than `cutoff`. Concurrent appends may land slightly out
/// of timestamp order, so every record is checked.
fn prune(history: &mut VecDeque<MessageRecord>, cutoff: i64) {
    history.retain(|record| record.timestamp >= cutoff);
}
