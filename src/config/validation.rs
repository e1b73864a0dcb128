//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("bot.data_path is required")]
    MissingDataPath,
    #[error("automod.spam_threshold must be at least 1")]
    ZeroSpamThreshold,
    #[error("automod.duplicate_threshold must be at least 1")]
    ZeroDuplicateThreshold,
    #[error("automod.time_window_ms must be greater than 0")]
    ZeroTimeWindow,
    #[error("automod.caps_threshold must be within 0.0..=1.0, got {0}")]
    CapsThresholdOutOfRange(f32),
    #[error("relay.thread_prefix must not be empty")]
    EmptyThreadPrefix,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.bot.data_path.trim().is_empty() {
        errors.push(ValidationError::MissingDataPath);
    }

    let automod = &config.automod;
    if automod.spam_threshold == 0 {
        errors.push(ValidationError::ZeroSpamThreshold);
    }
    if automod.duplicate_threshold == 0 {
        errors.push(ValidationError::ZeroDuplicateThreshold);
    }
    if automod.time_window_ms == 0 {
        errors.push(ValidationError::ZeroTimeWindow);
    }
    if !(0.0..=1.0).contains(&automod.caps_threshold) {
        errors.push(ValidationError::CapsThresholdOutOfRange(
            automod.caps_threshold,
        ));
    }

    if config.relay.thread_prefix.trim().is_empty() {
        errors.push(ValidationError::EmptyThreadPrefix);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
