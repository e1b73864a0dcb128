//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Root config struct, bot identity, loading
//! - [`automod`]: Spam window thresholds and AutoMod actions (AutoModConfig)
//! - [`relay`]: Staff relay presentation (RelayConfig)
//! - [`defaults`]: serde default functions
//! - [`validation`]: Startup validation

mod automod;
mod defaults;
mod relay;
mod types;
mod validation;

pub use automod::AutoModConfig;
pub use relay::RelayConfig;
pub use types::{BotConfig, Config, ConfigError};
pub use validation::{ValidationError, validate};
