//! Staff relay.
//!
//! Bridges direct messages from external users into per-user staff threads
//! and carries staff replies back.

mod dispatcher;
mod format;

pub use dispatcher::{
    EndOutcome, InboundOutcome, Opened, RelayDispatcher, ReplyOutcome, SessionState,
};
