//! Security module.
//!
//! Provides the public-channel anti-abuse features:
//! - **Message Window**: per-user sliding window of recent messages
//! - **Spam Classifier**: COUNT/DUPLICATE verdicts over a window snapshot,
//!   plus standalone caps and mention predicates
//! - **AutoMod**: turns a positive verdict into delete + timeout + notice
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     Security Module                      │
//! ├──────────────────┬───────────────────┬───────────────────┤
//! │  MessageWindow   │  SpamClassifier   │      AutoMod      │
//! │  DashMap<User,   │  COUNT, DUPLICATE │  Moderator port   │
//! │  VecDeque<Rec>>  │  caps, mentions   │  audit + notice   │
//! └──────────────────┴───────────────────┴───────────────────┘
//! ```

pub mod automod;
pub mod spam;
pub mod window;

pub use automod::{AutoMod, AutoModOutcome, SkipReason};
pub use spam::{MessageReport, SpamClassifier, SpamReason, SpamVerdict};
pub use window::{MessageRecord, MessageWindowStore, WindowStats};
