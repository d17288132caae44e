//! Demo inbox contents.
//!
//! A small mixed-platform inbox used by the console and by tests that
//! want a realistic starting state.

use crate::message::NewMessage;
use crate::platform::Platform;
use crate::registry::Conversation;
use chrono::{DateTime, Duration, Utc};
use omnichat_core::ConversationId;

/// Conversation that ships with a sample message thread.
pub const DEMO_THREAD_CONVERSATION: &str = "1";

/// The five demo conversations, relative to `now`.
#[must_use]
pub fn demo_conversations(now: DateTime<Utc>) -> Vec<Conversation> {
    vec![
        Conversation::new("1", "Alex Johnson", Platform::Telegram)
            .with_preview("Can you send me the project files?", now - Duration::minutes(2))
            .with_unread(2),
        Conversation::new("2", "Gaming Squad", Platform::Discord)
            .with_preview("GG everyone! Same time tomorrow?", now - Duration::minutes(15))
            .with_unread(5),
        Conversation::new("3", "Sarah Miller", Platform::Telegram)
            .with_preview("The meeting is confirmed for 3 PM", now - Duration::hours(1)),
        Conversation::new("4", "Dev Community", Platform::Discord)
            .with_preview("Check out this new React hook...", now - Duration::hours(2))
            .with_unread(12),
        Conversation::new("5", "Work Team", Platform::Telegram)
            .with_preview("Sprint planning tomorrow at 10", now - Duration::hours(3)),
    ]
}

/// The sample thread of [`DEMO_THREAD_CONVERSATION`], oldest first.
#[must_use]
pub fn demo_thread(now: DateTime<Utc>) -> (ConversationId, Vec<NewMessage>) {
    let platform = Platform::Telegram;
    let remote = |text: &str, minutes_ago: i64| {
        NewMessage::remote(text, platform, "Alex Johnson")
            .with_timestamp(now - Duration::minutes(minutes_ago))
    };
    let local = |text: &str, minutes_ago: i64| {
        NewMessage::local(text, platform).with_timestamp(now - Duration::minutes(minutes_ago))
    };

    let messages = vec![
        remote("Hey! How's the project going?", 8),
        local("Going well! Just finished the design phase.", 6),
        remote("That's great! Can you send me the project files?", 5),
        local("Sure, I'll package them up and send shortly.", 3),
        remote(
            "Perfect! Also, do we have the meeting confirmed for tomorrow?",
            2,
        ),
    ];
    (ConversationId::new(DEMO_THREAD_CONVERSATION), messages)
}
