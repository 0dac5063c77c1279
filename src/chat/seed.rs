//! Deterministic demo conversations.
//!
//! Timestamps are computed relative to an injected `now`, identifiers are
//! fixed. Conversations come out most-recent-first.

use chrono::{DateTime, Duration, Utc};

use crate::chat::core::category::Category;
use crate::chat::core::config::ChatConfig;
use crate::chat::core::conversation::{Conversation, preview_of};
use crate::chat::core::ids::{ConversationId, MessageId};
use crate::chat::core::message::Message;
use crate::chat::templates;

struct SeedMessage {
    category: Option<Category>,
    content: &'static str,
    minutes_ago: i64,
}

struct SeedConversation {
    title: &'static str,
    category: Category,
    messages: Vec<SeedMessage>,
}

const fn user(content: &'static str, minutes_ago: i64) -> SeedMessage {
    SeedMessage {
        category: None,
        content,
        minutes_ago,
    }
}

const fn assistant(category: Category, content: &'static str, minutes_ago: i64) -> SeedMessage {
    SeedMessage {
        category: Some(category),
        content,
        minutes_ago,
    }
}

fn seed_script() -> Vec<SeedConversation> {
    use Category::{Company, Personal};

    vec![
        SeedConversation {
            title: "Q3 Client Pipeline Review",
            category: Company,
            messages: vec![
                assistant(Company, templates::greeting(Company), 40),
                user("What did clients say about budgets last week?", 15),
                assistant(
                    Company,
                    "Based on last week's client meetings, the main theme was **budget approval \
for Q3**. Three clients raised timeline concerns.",
                    14,
                ),
                user("Which clients raised timeline concerns?", 13),
                assistant(
                    Company,
                    "**Northwind**, **Fabrikam** and **Tailspin** each asked whether delivery \
could slip into Q4.",
                    12,
                ),
            ],
        },
        SeedConversation {
            title: "Acme Kickoff Follow-up",
            category: Company,
            messages: vec![
                assistant(Company, templates::greeting(Company), 150),
                user("Summarize the Acme kickoff", 125),
                assistant(
                    Company,
                    "The Acme kickoff recording shows agreement on **a phased rollout**. Phase \
one starts next month.",
                    120,
                ),
            ],
        },
        SeedConversation {
            title: "Weekly Planning",
            category: Personal,
            messages: vec![
                assistant(Personal, templates::greeting(Personal), 1_500),
                user("How busy is my week?", 1_445),
                assistant(
                    Personal,
                    "You spent about **11 hours** in meetings this week, two fewer than last \
week.",
                    1_440,
                ),
            ],
        },
        SeedConversation {
            title: "Contoso Workshop Prep",
            category: Personal,
            messages: vec![
                assistant(Company, templates::greeting(Company), 4_400),
                user("What topics keep coming up with Contoso?", 4_380),
                assistant(
                    Company,
                    "Across recent calls, clients mentioned **data migration** most often. It \
may be worth a dedicated workshop.",
                    4_378,
                ),
                assistant(Personal, templates::switch_announcement(Personal), 4_330),
                user("Block time for me to prepare", 4_325),
                assistant(
                    Personal,
                    "Your next free **90-minute block** is Wednesday afternoon. Want me to hold \
it for deep work?",
                    4_320,
                ),
            ],
        },
    ]
}

/// Identifier of the `index`-th seed conversation.
#[must_use]
pub const fn seed_conversation_id(index: usize) -> ConversationId {
    ConversationId::from_u128(0x5eed_0000_0000_0000_0000_0000_0000_0000 | index as u128)
}

const fn seed_message_id(conversation: usize, message: usize) -> MessageId {
    MessageId::from_u128(
        0x5eed_0000_0000_0000_0000_0001_0000_0000
            | ((conversation as u128) << 16)
            | message as u128,
    )
}

/// Build the demo conversations, most recent first.
#[must_use]
pub fn seed_conversations(now: DateTime<Utc>, config: &ChatConfig) -> Vec<Conversation> {
    seed_script()
        .into_iter()
        .enumerate()
        .map(|(conv_index, seed)| {
            let messages: Vec<Message> = seed
                .messages
                .into_iter()
                .enumerate()
                .map(|(msg_index, m)| {
                    let timestamp = now - Duration::minutes(m.minutes_ago);
                    match m.category {
                        Some(category) => Message::assistant(m.content, category, timestamp),
                        None => Message::user(m.content, timestamp),
                    }
                    .with_id(seed_message_id(conv_index, msg_index))
                })
                .collect();

            let (preview, last_activity) = messages.last().map_or_else(
                || (String::new(), now),
                |last| {
                    (
                        preview_of(&last.content, config.preview_max_chars, &config.preview_ellipsis),
                        last.timestamp,
                    )
                },
            );

            Conversation::from_parts(
                seed_conversation_id(conv_index),
                seed.title,
                preview,
                last_activity,
                seed.category,
                messages,
            )
        })
        .collect()
}
