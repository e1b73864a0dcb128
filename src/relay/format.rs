//! Message texts posted by the relay.

use crate::platform::{Author, UserId};

pub fn thread_name(prefix: &str, target: &Author) -> String {
    format!("{prefix}-{}", target.tag)
}

/// First message in a fresh staff thread.
pub fn session_header(staff: &Author, target: &Author) -> String {
    format!(
        "📋 **Relay session opened by {}**\nUser: {} ({})\nReplies in this thread are sent to the user.",
        staff.tag,
        target.tag,
        target.id
    )
}

/// Staff message as echoed into the thread when the session opens.
pub fn staff_opening(staff: &Author, message: &str) -> String {
    format!("📩 **{}:** {message}", staff.tag)
}

/// Direct message that opens a session on the user side.
pub fn opening_dm(message: &str) -> String {
    format!("📩 **Message from the staff team:**\n\n{message}")
}

/// User message forwarded into the staff thread.
pub fn forwarded(author: &Author, content: &str) -> String {
    format!("📨 **{}:** {content}", author.tag)
}

/// Staff reply delivered to the user.
pub fn staff_reply(staff: &Author, content: &str) -> String {
    format!("📩 **Reply from {}:** {content}", staff.tag)
}

pub fn undeliverable(user: UserId) -> String {
    format!(
        "⚠️ Could not deliver this message to <@{user}>. They may have DMs disabled or have blocked the bot."
    )
}

pub fn replaced() -> &'static str {
    "ℹ️ This session was replaced by a newer one and is no longer relayed."
}

pub fn ended_dm() -> &'static str {
    "🔒 This conversation with the staff team has been closed."
}

pub fn ended_notice(staff: &Author) -> String {
    format!("🔒 Session ended by {}.", staff.tag)
}

pub fn end_notify_failed(user: UserId) -> String {
    format!("⚠️ Could not notify <@{user}> that the session ended.")
}
