//! Conversation session subsystem.
//!
//! This module provides the chat view's state machine, organized into:
//! - `core`: Configuration, errors, IDs, categories, messages and conversations
//! - `ports`: Injected clock, randomness and key-value storage
//! - `templates`: Greetings, switch announcements and reply pools
//! - `seed`: Deterministic demo conversations
//! - `registry`: The conversation registry and its mutation points
//! - `simulator`: Delayed canned replies with per-conversation backpressure
//! - `session`: Session state and the submission flow
//! - `pump`: Tokio worker delivering due replies
//! - `markup`: Emphasis marker splitting for renderers

pub mod core;
pub mod markup;
pub mod ports;
pub mod pump;
pub mod registry;
pub mod seed;
pub mod session;
pub mod simulator;
pub mod templates;

pub use self::core::{
    Category, ChatConfig, ChatConfigBuilder, ChatError, ChatResult, Conversation, ConversationId,
    ConversationSummary, Message, MessageId, Sender,
};
pub use markup::{EmphasisParser, Span};
pub use ports::{
    Clock, JsonFileStore, KeyValueStore, ManualClock, MemoryStore, RandomSource, RngSource,
    ScriptedRandom, SystemClock,
};
pub use pump::{ReplyPump, SharedSession};
pub use registry::ConversationRegistry;
pub use session::{ChatSession, DeliveredReply, SessionView, SubmitOutcome};
pub use simulator::{PendingReply, ReplySimulator};
