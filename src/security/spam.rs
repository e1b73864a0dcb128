//! Spam classification.
//!
//! Windowed rules, evaluated in order over a snapshot of the author's
//! recent messages:
//! 1. **COUNT**: too many messages inside the window
//! 2. **DUPLICATE**: the same message (case and surrounding whitespace
//!    ignored) repeated inside the window
//!
//! The first rule that fires names the reason; the reason is diagnostic only.
//!
//! Message-level predicates (`excessive_caps`, `excessive_mentions`) are
//! evaluated on a single message and are not part of the windowed verdict.
//! They are bundled in [`MessageReport`] for callers that build a composite
//! policy.

use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use super::window::MessageRecord;
use crate::config::AutoModConfig;

/// User and role mention tokens: `<@id>`, `<@!id>`, `<@&id>`.
static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@[!&]?\d+>").expect("mention pattern is valid"));

/// Rule that produced a positive verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpamReason {
    Count,
    Duplicate,
}

impl fmt::Display for SpamReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Count => "COUNT",
            Self::Duplicate => "DUPLICATE",
        })
    }
}

/// Spam detection result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpamVerdict {
    /// Window is within limits
    Clean,
    /// Window breaks a rule
    Spam { reason: SpamReason },
}

impl SpamVerdict {
    #[inline]
    pub fn is_spam(&self) -> bool {
        matches!(self, Self::Spam { .. })
    }

    #[inline]
    pub fn reason(&self) -> Option<SpamReason> {
        match self {
            Self::Clean => None,
            Self::Spam { reason } => Some(*reason),
        }
    }
}

/// Windowed verdict plus the message-level predicates for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageReport {
    pub verdict: SpamVerdict,
    pub excessive_caps: bool,
    pub excessive_mentions: bool,
}

impl MessageReport {
    /// Whether any check fired, windowed or not.
    pub fn any(&self) -> bool {
        self.verdict.is_spam() || self.excessive_caps || self.excessive_mentions
    }
}

#[derive(Debug, Clone)]
pub struct SpamClassifier {
    spam_threshold: usize,
    duplicate_threshold: usize,
    caps_threshold: f32,
    min_message_length: usize,
    max_mentions: usize,
}

impl SpamClassifier {
    pub fn new(config: &AutoModConfig) -> Self {
        Self {
            spam_threshold: config.spam_threshold,
            duplicate_threshold: config.duplicate_threshold,
            caps_threshold: config.caps_threshold,
            min_message_length: config.min_message_length,
            max_mentions: config.max_mentions,
        }
    }

    /// Classify a window snapshot.
    pub fn classify(&self, snapshot: &[MessageRecord]) -> SpamVerdict {
        if snapshot.len() >= self.spam_threshold {
            return SpamVerdict::Spam {
                reason: SpamReason::Count,
            };
        }
        if largest_duplicate_group(snapshot) >= self.duplicate_threshold {
            return SpamVerdict::Spam {
                reason: SpamReason::Duplicate,
            };
        }
        SpamVerdict::Clean
    }

    /// True when the message has enough letters and most of them are uppercase.
    pub fn excessive_caps(&self, content: &str) -> bool {
        let (letters, upper) = content
            .chars()
            .filter(|c| c.is_alphabetic())
            .fold((0usize, 0usize), |(letters, upper), c| {
                (letters + 1, upper + usize::from(c.is_uppercase()))
            });
        if letters == 0 || letters < self.min_message_length {
            return false;
        }
        upper as f32 / letters as f32 >= self.caps_threshold
    }

    /// True when the message pings more users/roles than allowed.
    pub fn excessive_mentions(&self, content: &str) -> bool {
        MENTION.find_iter(content).count() > self.max_mentions
    }

    pub fn report(&self, snapshot: &[MessageRecord], content: &str) -> MessageReport {
        MessageReport {
            verdict: self.classify(snapshot),
            excessive_caps: self.excessive_caps(content),
            excessive_mentions: self.excessive_mentions(content),
        }
    }
}

impl Default for SpamClassifier {
    fn default() -> Self {
        Self::new(&AutoModConfig::default())
    }
}

/// Size of the largest group of records sharing `lowercase(trim(content))`.
fn largest_duplicate_group(snapshot: &[MessageRecord]) -> usize {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in snapshot {
        *counts
            .entry(record.content.trim().to_lowercase())
            .or_insert(0) += 1;
    }
    counts.into_values().max().unwrap_or(0)
}
