//! Staff command execution.

use tracing::warn;

use super::Router;
use crate::events::{CommandInvocation, CommandReply, StaffCommand};
use crate::relay::EndOutcome;
use crate::telemetry::CommandTimer;

impl Router {
    pub(super) async fn run_command(&self, invocation: CommandInvocation) -> CommandReply {
        let _timer = CommandTimer::new(invocation.command.name());
        let CommandInvocation {
            guild,
            invoker,
            command,
        } = invocation;

        match command {
            StaffCommand::Open { user, message } => {
                match self.relay.open(guild, &invoker, user, &message).await {
                    Ok(opened) => CommandReply::ok(format!(
                        "✅ Opened a relay session with {} in <#{}>.",
                        opened.target.tag, opened.session.thread
                    )),
                    Err(e) => {
                        warn!(error = %e, code = e.error_code(), user = %user, "Open failed");
                        CommandReply::failed(e.to_reply())
                    }
                }
            }
            StaffCommand::End { user } => match self.relay.end(guild, &invoker, user).await {
                EndOutcome::Ended { .. } => {
                    CommandReply::ok(format!("✅ Ended DM conversation with <@{user}>."))
                }
                EndOutcome::NoActiveSession => CommandReply::failed(format!(
                    "⚠️ There is no active session with <@{user}>."
                )),
            },
            StaffCommand::Setup { channel } => match self.relay.configure(guild, channel).await {
                Ok(()) => {
                    CommandReply::ok(format!("✅ Relay threads will be created in <#{channel}>."))
                }
                Err(e) => {
                    warn!(error = %e, code = e.error_code(), channel = %channel, "Setup failed");
                    CommandReply::failed(e.to_reply())
                }
            },
            StaffCommand::Automod { enabled } => {
                self.settings.set_automod(guild, enabled).await;
                CommandReply::ok(if enabled {
                    "✅ AutoMod has been enabled."
                } else {
                    "✅ AutoMod has been disabled."
                })
            }
        }
    }
}
