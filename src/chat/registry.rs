//! Conversation registry: the only owner and mutation point of conversations.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::chat::core::category::Category;
use crate::chat::core::config::ChatConfig;
use crate::chat::core::conversation::{Conversation, ConversationSummary};
use crate::chat::core::errors::{ChatError, ChatResult};
use crate::chat::core::ids::{ConversationId, MessageId};
use crate::chat::core::message::Message;
use crate::chat::templates;

/// Preview shown for a conversation nobody has written in yet.
pub const NEW_CONVERSATION_PREVIEW: &str = "New conversation started";

/// Ordered set of conversations, most recently created first.
#[derive(Clone, Debug)]
pub struct ConversationRegistry {
    conversations: Vec<Conversation>,
    preview_max_chars: usize,
    preview_ellipsis: String,
    new_conversation_title: String,
}

impl ConversationRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(config: &ChatConfig) -> Self {
        Self::with_conversations(config, Vec::new())
    }

    /// Create a registry holding `conversations` in the given order.
    #[must_use]
    pub fn with_conversations(config: &ChatConfig, conversations: Vec<Conversation>) -> Self {
        Self {
            conversations,
            preview_max_chars: config.preview_max_chars,
            preview_ellipsis: config.preview_ellipsis.clone(),
            new_conversation_title: config.new_conversation_title.clone(),
        }
    }

    /// Conversations in display order.
    #[must_use]
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Sidebar projections in display order.
    #[must_use]
    pub fn summaries(&self) -> Vec<ConversationSummary> {
        self.conversations.iter().map(ConversationSummary::from).collect()
    }

    /// Number of conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Look up a conversation.
    #[must_use]
    pub fn get(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id() == id)
    }

    /// Look up a conversation, failing with `NotFound`.
    ///
    /// # Errors
    /// Returns `NotFound` if `id` is not registered.
    pub fn require(&self, id: ConversationId) -> ChatResult<&Conversation> {
        self.get(id).ok_or(ChatError::NotFound(id))
    }

    /// Whether `id` is registered.
    #[must_use]
    pub fn contains(&self, id: ConversationId) -> bool {
        self.get(id).is_some()
    }

    fn require_mut(&mut self, id: ConversationId) -> ChatResult<&mut Conversation> {
        self.conversations
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or(ChatError::NotFound(id))
    }

    /// Create a conversation seeded with the category greeting and put it first.
    pub fn create(&mut self, category: Category, now: DateTime<Utc>) -> &Conversation {
        let greeting = Message::assistant(templates::greeting(category), category, now);
        let conversation = Conversation::from_parts(
            ConversationId::new(),
            self.new_conversation_title.clone(),
            NEW_CONVERSATION_PREVIEW,
            now,
            category,
            vec![greeting],
        );

        info!(conversation = %conversation.id(), %category, "Created conversation");
        self.conversations.insert(0, conversation);
        &self.conversations[0]
    }

    /// Append a message and refresh the conversation's preview and activity.
    ///
    /// Assistant messages must carry the conversation's current category;
    /// category changes go through [`Self::switch_category`].
    ///
    /// # Errors
    /// Returns `NotFound` if `id` is not registered and `CategoryMismatch` for
    /// an assistant message tagged with another category, or none.
    pub fn append_message(&mut self, id: ConversationId, message: Message) -> ChatResult<MessageId> {
        let preview_max = self.preview_max_chars;
        let ellipsis = self.preview_ellipsis.clone();
        let conversation = self.require_mut(id)?;
        let message_id = message.id;

        let expected = conversation.category();
        if message.is_assistant() && message.category != Some(expected) {
            return Err(ChatError::CategoryMismatch {
                conversation: id,
                expected,
                found: message.category,
            });
        }

        debug!(
            conversation = %id,
            message = %message_id,
            sender = %message.sender,
            "Appending message"
        );
        conversation.push_message(message, preview_max, &ellipsis);
        Ok(message_id)
    }

    /// Set the conversation's category and append the matching announcement.
    ///
    /// Both changes are applied together. The announcement is appended even
    /// when `category` equals the current one.
    ///
    /// # Errors
    /// Returns `NotFound` if `id` is not registered.
    pub fn switch_category(
        &mut self,
        id: ConversationId,
        category: Category,
        now: DateTime<Utc>,
    ) -> ChatResult<MessageId> {
        let preview_max = self.preview_max_chars;
        let ellipsis = self.preview_ellipsis.clone();
        let conversation = self.require_mut(id)?;

        let previous = conversation.category();
        let announcement =
            Message::assistant(templates::switch_announcement(category), category, now);
        let message_id = announcement.id;

        conversation.set_category(category);
        conversation.push_message(announcement, preview_max, &ellipsis);

        info!(conversation = %id, from = %previous, to = %category, "Switched category");
        Ok(message_id)
    }

    /// Conversations whose title or preview contains `query`, ignoring case.
    ///
    /// A blank query matches everything. Display order is preserved.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Conversation> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.conversations.iter().collect();
        }

        self.conversations
            .iter()
            .filter(|c| {
                c.title().to_lowercase().contains(&needle)
                    || c.last_message_preview().to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::core::message::Sender;
    use crate::chat::seed::seed_conversations;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap()
    }

    fn seeded() -> ConversationRegistry {
        let config = ChatConfig::default();
        ConversationRegistry::with_conversations(&config, seed_conversations(now(), &config))
    }

    #[test]
    fn test_create_inserts_at_front() {
        let mut registry = seeded();
        let before: Vec<ConversationId> = registry.conversations().iter().map(Conversation::id).collect();

        let created = registry.create(Category::Personal, now()).id();

        let after: Vec<ConversationId> = registry.conversations().iter().map(Conversation::id).collect();
        assert_eq!(after[0], created);
        assert_eq!(&after[1..], before.as_slice());
    }

    #[test]
    fn test_create_seeds_greeting_and_placeholder() {
        let mut registry = ConversationRegistry::new(&ChatConfig::default());
        let created = registry.create(Category::Company, now());

        assert_eq!(created.title(), "New Conversation");
        assert_eq!(created.last_message_preview(), NEW_CONVERSATION_PREVIEW);
        assert_eq!(created.messages().len(), 1);
        let greeting = &created.messages()[0];
        assert_eq!(greeting.sender, Sender::Assistant);
        assert_eq!(greeting.content, templates::greeting(Category::Company));
        assert_eq!(greeting.category, Some(Category::Company));
    }

    #[test]
    fn test_append_updates_preview_and_activity() {
        let mut registry = seeded();
        let id = registry.conversations()[1].id();
        let later = now() + chrono::Duration::seconds(5);

        registry.append_message(id, Message::user("Short note", later)).unwrap();

        let conversation = registry.get(id).unwrap();
        assert_eq!(conversation.last_message_preview(), "Short note");
        assert_eq!(conversation.last_activity(), later);
    }

    #[test]
    fn test_append_truncates_long_preview() {
        let mut registry = seeded();
        let id = registry.conversations()[0].id();
        let long = "a".repeat(80);

        registry.append_message(id, Message::user(long, now())).unwrap();

        let preview = registry.get(id).unwrap().last_message_preview();
        assert_eq!(preview, format!("{}...", "a".repeat(50)));
    }

    #[test]
    fn test_append_does_not_reorder() {
        let mut registry = seeded();
        let order: Vec<ConversationId> = registry.conversations().iter().map(Conversation::id).collect();
        registry.append_message(order[3], Message::user("bump", now())).unwrap();

        let after: Vec<ConversationId> = registry.conversations().iter().map(Conversation::id).collect();
        assert_eq!(after, order);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut registry = seeded();
        let missing = ConversationId::from_u128(99);

        assert!(matches!(
            registry.append_message(missing, Message::user("x", now())),
            Err(ChatError::NotFound(id)) if id == missing
        ));
        assert!(matches!(
            registry.switch_category(missing, Category::Company, now()),
            Err(ChatError::NotFound(_))
        ));
        assert!(registry.require(missing).is_err());
    }

    #[test]
    fn test_append_rejects_assistant_message_from_other_category() {
        let mut registry = seeded();
        let id = registry.conversations()[0].id();
        let current = registry.get(id).unwrap().category();
        let count = registry.get(id).unwrap().messages().len();

        let foreign = Message::assistant("off-topic", current.other(), now());
        assert!(matches!(
            registry.append_message(id, foreign),
            Err(ChatError::CategoryMismatch { expected, found, .. })
                if expected == current && found == Some(current.other())
        ));

        let mut untagged = Message::assistant("untagged", current, now());
        untagged.category = None;
        assert!(matches!(
            registry.append_message(id, untagged),
            Err(ChatError::CategoryMismatch { found: None, .. })
        ));

        let conversation = registry.get(id).unwrap();
        assert_eq!(conversation.messages().len(), count);
        assert_eq!(conversation.last_message().unwrap().category, Some(current));

        registry
            .append_message(id, Message::assistant("on-topic", current, now()))
            .unwrap();
        assert_eq!(registry.get(id).unwrap().messages().len(), count + 1);
    }

    #[test]
    fn test_switch_category_is_atomic() {
        let mut registry = seeded();
        let id = registry.conversations()[0].id();

        registry.switch_category(id, Category::Personal, now()).unwrap();

        let conversation = registry.get(id).unwrap();
        let last = conversation.last_message().unwrap();
        assert_eq!(conversation.category(), Category::Personal);
        assert_eq!(last.sender, Sender::Assistant);
        assert_eq!(last.category, Some(Category::Personal));
        assert_eq!(last.content, templates::switch_announcement(Category::Personal));
    }

    #[test]
    fn test_switch_to_same_category_still_announces() {
        let mut registry = seeded();
        let id = registry.conversations()[0].id();
        let current = registry.get(id).unwrap().category();
        let count = registry.get(id).unwrap().messages().len();

        registry.switch_category(id, current, now()).unwrap();

        let conversation = registry.get(id).unwrap();
        assert_eq!(conversation.messages().len(), count + 1);
        assert_eq!(conversation.category(), current);
    }

    #[test]
    fn test_search_filters_title_and_preview() {
        let registry = seeded();
        let hits = registry.search("acme");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title(), "Acme Kickoff Follow-up");

        let by_preview = registry.search("TAILSPIN");
        assert_eq!(by_preview.len(), 1);

        assert_eq!(registry.search("   ").len(), registry.len());
        assert!(registry.search("nothing matches this").is_empty());
    }
}
