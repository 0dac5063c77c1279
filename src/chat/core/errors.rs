//! Error types for the chat and dashboard subsystems.

use thiserror::Error;

use crate::chat::core::category::Category;
use crate::chat::core::ids::ConversationId;

/// Chat subsystem error type.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The referenced conversation is not in the registry.
    #[error("conversation not found: {0}")]
    NotFound(ConversationId),
    /// A category outside the two supported modes was supplied.
    #[error("invalid category: {0:?}")]
    InvalidCategory(String),
    /// An assistant message whose category differs from its conversation's.
    #[error("assistant message category {found:?} does not match conversation {conversation} ({expected})")]
    CategoryMismatch {
        /// Target conversation.
        conversation: ConversationId,
        /// The conversation's current category.
        expected: Category,
        /// Category carried by the message.
        found: Option<Category>,
    },
    /// An upstream record could not be mapped to its canonical shape.
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Regex error.
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl ChatError {
    /// Whether the caller may log and carry on.
    ///
    /// `NotFound` only arises from stale identifiers; `InvalidCategory` and
    /// `InvalidConfig` are programming or deployment mistakes.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::MalformedRecord(_) | Self::Io(_))
    }
}

/// Convenience result alias for chat operations.
pub type ChatResult<T> = Result<T, ChatError>;
