//! Conversation threads and their sidebar metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::chat::core::category::Category;
use crate::chat::core::ids::ConversationId;
use crate::chat::core::message::Message;

/// A named, ordered thread of messages with an operating category.
///
/// Fields are read-only outside the crate; every mutation goes through
/// [`crate::chat::registry::ConversationRegistry`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Conversation {
    id: ConversationId,
    title: String,
    last_message_preview: String,
    last_activity: DateTime<Utc>,
    category: Category,
    messages: Vec<Message>,
}

impl Conversation {
    /// Build a conversation from parts. The preview is taken as given.
    #[must_use]
    pub(crate) fn from_parts(
        id: ConversationId,
        title: impl Into<String>,
        preview: impl Into<String>,
        last_activity: DateTime<Utc>,
        category: Category,
        messages: Vec<Message>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            last_message_preview: preview.into(),
            last_activity,
            category,
            messages,
        }
    }

    /// Conversation identifier.
    #[must_use]
    pub const fn id(&self) -> ConversationId {
        self.id
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Truncated copy of the latest message, or a placeholder.
    #[must_use]
    pub fn last_message_preview(&self) -> &str {
        &self.last_message_preview
    }

    /// Time of the latest append.
    #[must_use]
    pub const fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Current operating category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Messages in insertion order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent message, if any.
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Append a message and refresh preview and activity.
    ///
    /// Timestamps never go backwards within one conversation: an older
    /// timestamp is raised to the previous message's.
    pub(crate) fn push_message(&mut self, mut message: Message, preview_max: usize, ellipsis: &str) {
        if let Some(last) = self.messages.last() {
            if message.timestamp < last.timestamp {
                warn!(
                    conversation = %self.id,
                    "message timestamp precedes previous message; clamping"
                );
                message.timestamp = last.timestamp;
            }
        }

        self.last_message_preview = preview_of(&message.content, preview_max, ellipsis);
        self.last_activity = message.timestamp;
        self.messages.push(message);
    }

    pub(crate) const fn set_category(&mut self, category: Category) {
        self.category = category;
    }
}

/// Sidebar projection of a conversation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Conversation identifier.
    pub id: ConversationId,
    /// Display title.
    pub title: String,
    /// Preview of the latest message.
    pub last_message_preview: String,
    /// Time of the latest append.
    pub last_activity: DateTime<Utc>,
    /// Current category.
    pub category: Category,
    /// Number of messages in the thread.
    pub message_count: usize,
}

impl From<&Conversation> for ConversationSummary {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id,
            title: conversation.title.clone(),
            last_message_preview: conversation.last_message_preview.clone(),
            last_activity: conversation.last_activity,
            category: conversation.category,
            message_count: conversation.messages.len(),
        }
    }
}

/// First `max_chars` characters of `content`, followed by `ellipsis` when cut.
#[must_use]
pub fn preview_of(content: &str, max_chars: usize, ellipsis: &str) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ellipsis}", &content[..cut]),
        None => content.to_string(),
    }
}
