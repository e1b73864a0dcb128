//! Telemetry utilities for command timing and event correlation.

use std::time::Instant;
use tracing::debug;

/// Guard for timing command execution.
///
/// Logs command latency when dropped.
pub struct CommandTimer {
    command: &'static str,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: &'static str) -> Self {
        Self {
            command,
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1_000.0;
        debug!(command = self.command, elapsed_ms, "Command completed");
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Create a span for one inbound message event.
    pub fn event(kind: &str, author: &str, guild: Option<&str>) -> Span {
        if let Some(guild) = guild {
            info_span!("event", kind = %kind, author = %author, guild = %guild)
        } else {
            info_span!("event", kind = %kind, author = %author)
        }
    }

    /// Create a span for a staff command execution.
    pub fn command(name: &str, guild: &str, invoker: &str) -> Span {
        info_span!("command", name = %name, guild = %guild, invoker = %invoker)
    }
}
