//! State management module.
//!
//! Contains the shared document store and the components built on it:
//! the session directory (relay mappings) and per-guild settings.

mod guilds;
mod sessions;
mod store;

pub use guilds::GuildSettings;
pub use sessions::{Session, SessionDirectory};
pub use store::DocumentStore;
