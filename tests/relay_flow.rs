//! Integration tests for the staff relay: open, forward both ways, end.

mod common;

use common::TestBot;
use common::bot::GUILD;
use staffrelay::events::StaffCommand;
use staffrelay::handlers::Routed;
use staffrelay::relay::{InboundOutcome, ReplyOutcome, SessionState};

#[tokio::test]
async fn test_relay_round_trip() {
    let bot = TestBot::start().await;
    let alice = bot.user("alice#0001");

    let reply = bot
        .command(StaffCommand::Open {
            user: alice.id,
            message: "Welcome, how can we help?".into(),
        })
        .await;
    assert!(reply.success, "{}", reply.content);

    let SessionState::Active(thread) = bot.router.relay().state(GUILD, alice.id) else {
        panic!("session should be active");
    };
    let before = bot.platform.bot_messages(thread).len();

    let (inbound, routed) = bot.dm(&alice, "hello").await;
    assert!(matches!(routed, Routed::Inbound(InboundOutcome::Forwarded(_))));
    let thread_log = bot.platform.bot_messages(thread);
    assert_eq!(thread_log.len(), before + 1);
    assert_eq!(thread_log[before], "📨 **alice#0001:** hello");
    assert_eq!(bot.platform.reactions(&inbound), vec!["📬".to_string()]);

    let (outbound, routed) = bot.staff_says(thread, "hi there").await;
    assert!(matches!(routed, Routed::StaffReply(ReplyOutcome::Delivered(_))));
    let dms = bot.platform.direct_messages(alice.id);
    let replies: Vec<_> = dms.iter().filter(|m| m.contains("hi there")).collect();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0], "📩 **Reply from mod#0001:** hi there");
    assert_eq!(bot.platform.reactions(&outbound), vec!["✅".to_string()]);
}

#[tokio::test]
async fn test_dead_thread_self_heals() {
    let bot = TestBot::start().await;
    let alice = bot.user("alice#0001");
    bot.command(StaffCommand::Open {
        user: alice.id,
        message: "ping".into(),
    })
    .await;
    let SessionState::Active(thread) = bot.router.relay().state(GUILD, alice.id) else {
        panic!("session should be active");
    };

    bot.platform.delete_channel(thread);
    let saves = bot.store.saves();
    let (_, routed) = bot.dm(&alice, "still there?").await;

    assert!(matches!(routed, Routed::Inbound(InboundOutcome::CleanedUp(_))));
    assert_eq!(bot.store.saves(), saves + 1);
    let directory = bot.router.relay().directory();
    assert_eq!(directory.find_by_user(GUILD, alice.id), None);
    assert_eq!(directory.find_by_thread(GUILD, thread), None);
    assert_eq!(bot.router.relay().state(GUILD, alice.id), SessionState::Ended);

    // A later DM gets the standing instruction.
    let (_, routed) = bot.dm(&alice, "hello?").await;
    assert_eq!(routed, Routed::Inbound(InboundOutcome::NoSession));
}

#[tokio::test]
async fn test_open_with_unreachable_user() {
    let bot = TestBot::start().await;
    let carol = bot.user("carol#0003");
    bot.platform.block_dms(carol.id);

    let reply = bot
        .command(StaffCommand::Open {
            user: carol.id,
            message: "hello".into(),
        })
        .await;
    assert!(!reply.success);
    assert!(reply.content.contains("carol#0003"));
    assert_eq!(
        bot.router.relay().state(GUILD, carol.id),
        SessionState::NoSession
    );
    assert!(bot.platform.threads_in(GUILD).is_empty());
}

#[tokio::test]
async fn test_end_without_session() {
    let bot = TestBot::start().await;
    let bob = bot.user("bob#0002");
    let saves = bot.store.saves();

    let reply = bot.command(StaffCommand::End { user: bob.id }).await;
    assert!(!reply.success);
    assert!(reply.content.contains("no active session"));
    assert_eq!(bot.store.saves(), saves);
}

#[tokio::test]
async fn test_end_closes_and_archives() {
    let bot = TestBot::start().await;
    let alice = bot.user("alice#0001");
    bot.command(StaffCommand::Open {
        user: alice.id,
        message: "hi".into(),
    })
    .await;
    let SessionState::Active(thread) = bot.router.relay().state(GUILD, alice.id) else {
        panic!("session should be active");
    };

    let reply = bot.command(StaffCommand::End { user: alice.id }).await;
    assert!(reply.success, "{}", reply.content);
    assert!(bot.platform.is_archived(thread));
    assert_eq!(bot.router.relay().state(GUILD, alice.id), SessionState::Ended);

    // The persisted document no longer holds either direction.
    let saved = bot.store.snapshot();
    assert!(saved.guilds["1"].dm_threads.is_empty());
}

#[tokio::test]
async fn test_bot_authors_are_ignored() {
    let bot = TestBot::start().await;
    let helper = bot.platform.add_user("helper#0000", true);
    let (_, routed) = bot.dm(&helper, "beep").await;
    assert_eq!(routed, Routed::Ignored);
    assert!(bot.platform.direct_messages(helper.id).is_empty());
}

#[tokio::test]
async fn test_open_refuses_bot_target() {
    let bot = TestBot::start().await;
    let helper = bot.platform.add_user("helper#0000", true);
    let reply = bot
        .command(StaffCommand::Open {
            user: helper.id,
            message: "hi".into(),
        })
        .await;
    assert!(!reply.success);
    assert!(reply.content.contains("cannot DM a bot"));
    assert!(bot.platform.threads_in(GUILD).is_empty());
}
