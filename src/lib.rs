//! staffrelay - staff relay and AutoMod core for a guild chat bot.
//!
//! External users write to the bot privately; each conversation is mirrored
//! into a staff thread and staff replies are carried back. Public guild
//! messages pass through a sliding-window spam classifier that can delete
//! and time out offenders.
//!
//! The host chat platform is reached through the [`platform::Messenger`]
//! and [`platform::Moderator`] ports; persisted state goes through
//! [`persistence::Persistence`].

pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod handlers;
pub mod persistence;
pub mod platform;
pub mod relay;
pub mod security;
pub mod state;
pub mod telemetry;
