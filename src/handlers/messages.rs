//! Posted-message routing.

use tracing::debug;

use super::{Routed, Router};
use crate::events::IncomingMessage;
use crate::platform::ChannelKind;

/// Span label for a message.
pub(super) fn kind(msg: &IncomingMessage) -> &'static str {
    match msg.channel.kind {
        ChannelKind::Direct => "direct",
        ChannelKind::Thread => "thread",
        ChannelKind::Text => "public",
    }
}

/// Wall clock in epoch milliseconds.
fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl Router {
    pub(super) async fn route_message(&self, msg: &IncomingMessage) -> Routed {
        if msg.author.bot {
            return Routed::Ignored;
        }

        match msg.channel.kind {
            ChannelKind::Direct => Routed::Inbound(self.relay.forward_from_user(msg).await),
            ChannelKind::Thread => match self.relay.forward_from_staff(msg).await {
                Some(outcome) => Routed::StaffReply(outcome),
                None => {
                    debug!(thread = %msg.channel.id, "Thread is not a relay thread");
                    Routed::AutoMod(self.automod.inspect(msg, now_ms()).await)
                }
            },
            ChannelKind::Text => Routed::AutoMod(self.automod.inspect(msg, now_ms()).await),
        }
    }
}
