//! Core chat types and identifiers.

pub mod category;
pub mod config;
pub mod conversation;
pub mod errors;
pub mod ids;
pub mod message;

pub use category::Category;
pub use config::{ChatConfig, ChatConfigBuilder};
pub use conversation::{Conversation, ConversationSummary, preview_of};
pub use errors::{ChatError, ChatResult};
pub use ids::{ConversationId, MessageId};
pub use message::{Message, Sender};
