//! Conversation categories.
//!
//! A category is one of two mutually exclusive operating modes. It decides
//! which greeting, switch announcement and reply pool apply to a conversation.
//!
//! Notes:
//! - The enum is closed: any other value can only come in through text, and
//!   parsing text rejects it with [`ChatError::InvalidCategory`].
//! - String forms are stable `snake_case` identifiers for serialization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chat::core::errors::ChatError;

/// Operating mode of a conversation.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Company knowledge: meetings, clients, engagements.
    #[default]
    Company,
    /// Personal assistant: the user's own notes and schedule.
    Personal,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 2] = [Self::Company, Self::Personal];

    /// Stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Personal => "personal",
        }
    }

    /// Human label, as shown in announcements and the terminal.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::Personal => "Personal",
        }
    }

    /// The other category.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Company => Self::Personal,
            Self::Personal => Self::Company,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ChatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "company" => Ok(Self::Company),
            "personal" => Ok(Self::Personal),
            _ => Err(ChatError::InvalidCategory(value.to_string())),
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = ChatError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
