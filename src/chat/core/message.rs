//! Message model for conversation threads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::core::category::Category;
use crate::chat::core::ids::MessageId;

/// Author of a message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// Typed by the user.
    User,
    /// Produced by the assistant (replies, greetings, announcements).
    Assistant,
}

impl Sender {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(value.to_string()),
        }
    }
}

/// A single message in a conversation.
///
/// `content` is kept verbatim, including emphasis markers and surrounding
/// whitespace. `category` is only set on assistant messages.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier.
    pub id: MessageId,
    /// Raw text body.
    pub content: String,
    /// Author of the message.
    pub sender: Sender,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Category that produced an assistant message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Message {
    /// Build a user message.
    #[must_use]
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::new(),
            content: content.into(),
            sender: Sender::User,
            timestamp,
            category: None,
        }
    }

    /// Build an assistant message tagged with the category that produced it.
    #[must_use]
    pub fn assistant(
        content: impl Into<String>,
        category: Category,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            content: content.into(),
            sender: Sender::Assistant,
            timestamp,
            category: Some(category),
        }
    }

    /// Replace the generated identifier (seed data).
    #[must_use]
    pub const fn with_id(mut self, id: MessageId) -> Self {
        self.id = id;
        self
    }

    /// Whether the assistant wrote this message.
    #[must_use]
    pub const fn is_assistant(&self) -> bool {
        matches!(self.sender, Sender::Assistant)
    }
}
