//! Session state for one mounted chat view.
//!
//! Owns the registry, the reply simulator and the view-level state (active
//! conversation, active category, composing buffer). Replies are delivered
//! when [`ChatSession::deliver_due_replies`] is called after their delay has
//! elapsed on the injected clock; [`crate::chat::pump::ReplyPump`] does that
//! on a tokio timer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::chat::core::category::Category;
use crate::chat::core::config::ChatConfig;
use crate::chat::core::conversation::{Conversation, ConversationSummary};
use crate::chat::core::errors::ChatResult;
use crate::chat::core::ids::{ConversationId, MessageId};
use crate::chat::core::message::Message;
use crate::chat::ports::clock::Clock;
use crate::chat::ports::random::RandomSource;
use crate::chat::registry::ConversationRegistry;
use crate::chat::seed::seed_conversations;
use crate::chat::simulator::ReplySimulator;

/// Result of a submission.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// The message was appended and a reply scheduled.
    Accepted {
        /// Identifier of the appended user message.
        message_id: MessageId,
        /// When the simulated reply becomes due.
        reply_due_at: DateTime<Utc>,
    },
    /// Empty or whitespace-only text; nothing happened.
    IgnoredEmpty,
    /// A reply is still pending for this conversation; nothing happened.
    IgnoredWaiting,
}

impl SubmitOutcome {
    /// Whether the submission was accepted.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// A reply appended by [`ChatSession::deliver_due_replies`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DeliveredReply {
    /// Conversation that received the reply.
    pub conversation_id: ConversationId,
    /// The appended assistant message.
    pub message: Message,
}

/// Render snapshot for the view layer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SessionView {
    /// Sidebar entries in display order.
    pub conversations: Vec<ConversationSummary>,
    /// Currently selected conversation.
    pub active_conversation_id: ConversationId,
    /// Category of the selected conversation.
    pub active_category: Category,
    /// Messages of the selected conversation.
    pub messages: Vec<Message>,
    /// Whether the selected conversation awaits a reply.
    pub is_waiting_for_reply: bool,
    /// Unsent input.
    pub composing_text: String,
}

/// Conversation session manager.
pub struct ChatSession {
    config: ChatConfig,
    clock: Arc<dyn Clock>,
    registry: ConversationRegistry,
    simulator: ReplySimulator,
    active_conversation_id: ConversationId,
    active_category: Category,
    composing_text: String,
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("conversations", &self.registry.len())
            .field("active_conversation_id", &self.active_conversation_id)
            .field("active_category", &self.active_category)
            .field("simulator", &self.simulator)
            .finish_non_exhaustive()
    }
}

impl ChatSession {
    /// Create a session seeded with the demo conversations.
    ///
    /// # Errors
    /// Returns an error if `config` is invalid.
    pub fn new(
        config: ChatConfig,
        clock: Arc<dyn Clock>,
        random: Box<dyn RandomSource>,
    ) -> ChatResult<Self> {
        let seeds = seed_conversations(clock.now(), &config);
        Self::with_conversations(config, clock, random, seeds)
    }

    /// Create a session over explicit conversations.
    ///
    /// The first conversation becomes active; an empty list gets one fresh
    /// conversation in the default category.
    ///
    /// # Errors
    /// Returns an error if `config` is invalid.
    pub fn with_conversations(
        config: ChatConfig,
        clock: Arc<dyn Clock>,
        random: Box<dyn RandomSource>,
        conversations: Vec<Conversation>,
    ) -> ChatResult<Self> {
        config.validate()?;

        let mut registry = ConversationRegistry::with_conversations(&config, conversations);
        let (active_conversation_id, active_category) = match registry.conversations().first() {
            Some(first) => (first.id(), first.category()),
            None => {
                let created = registry.create(Category::default(), clock.now());
                (created.id(), created.category())
            }
        };
        let simulator = ReplySimulator::new(&config, random);

        info!(
            conversations = registry.len(),
            active = %active_conversation_id,
            "Chat session mounted"
        );

        Ok(Self {
            config,
            clock,
            registry,
            simulator,
            active_conversation_id,
            active_category,
            composing_text: String::new(),
        })
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Read access to the registry.
    #[must_use]
    pub const fn registry(&self) -> &ConversationRegistry {
        &self.registry
    }

    /// Conversations in display order.
    #[must_use]
    pub fn conversations(&self) -> &[Conversation] {
        self.registry.conversations()
    }

    /// Selected conversation id.
    #[must_use]
    pub const fn active_conversation_id(&self) -> ConversationId {
        self.active_conversation_id
    }

    /// Category of the selected conversation.
    #[must_use]
    pub const fn active_category(&self) -> Category {
        self.active_category
    }

    /// Selected conversation.
    #[must_use]
    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.registry.get(self.active_conversation_id)
    }

    /// Create a conversation in `category` and select it.
    pub fn create_conversation(&mut self, category: Category) -> ConversationId {
        let id = self.registry.create(category, self.clock.now()).id();
        self.active_conversation_id = id;
        self.active_category = category;
        id
    }

    /// Create a conversation in the session's active category and select it.
    pub fn start_new_conversation(&mut self) -> ConversationId {
        self.create_conversation(self.active_category)
    }

    /// Select a conversation.
    ///
    /// # Errors
    /// Returns `NotFound` if `id` is not registered.
    pub fn select_conversation(&mut self, id: ConversationId) -> ChatResult<()> {
        let category = self.registry.require(id)?.category();
        self.active_conversation_id = id;
        self.active_category = category;
        debug!(conversation = %id, %category, "Selected conversation");
        Ok(())
    }

    /// Append a message to a conversation.
    ///
    /// # Errors
    /// Returns `NotFound` if `id` is not registered and `CategoryMismatch` if
    /// an assistant message is not tagged with the conversation's category.
    pub fn append_message(&mut self, id: ConversationId, message: Message) -> ChatResult<MessageId> {
        self.registry.append_message(id, message)
    }

    /// Switch a conversation's category and append the announcement.
    ///
    /// The announcement is appended even when the category is unchanged.
    ///
    /// # Errors
    /// Returns `NotFound` if `id` is not registered.
    pub fn switch_category(&mut self, id: ConversationId, category: Category) -> ChatResult<MessageId> {
        let message_id = self.registry.switch_category(id, category, self.clock.now())?;
        if id == self.active_conversation_id {
            self.active_category = category;
        }
        Ok(message_id)
    }

    /// Switch the selected conversation's category.
    ///
    /// # Errors
    /// Returns `NotFound` if the selected conversation vanished.
    pub fn switch_active_category(&mut self, category: Category) -> ChatResult<MessageId> {
        self.switch_category(self.active_conversation_id, category)
    }

    /// Submit user text to a conversation.
    ///
    /// Text is stored verbatim. Blank text, or text sent while a reply is
    /// pending for the same conversation, is ignored.
    ///
    /// # Errors
    /// Returns `NotFound` if `id` is not registered.
    pub fn submit(&mut self, id: ConversationId, text: &str) -> ChatResult<SubmitOutcome> {
        self.registry.require(id)?;

        if text.trim().is_empty() {
            debug!(conversation = %id, "Ignoring blank submission");
            return Ok(SubmitOutcome::IgnoredEmpty);
        }
        if self.simulator.is_pending(id) {
            debug!(conversation = %id, "Ignoring submission while waiting for reply");
            return Ok(SubmitOutcome::IgnoredWaiting);
        }

        let now = self.clock.now();
        let message_id = self.registry.append_message(id, Message::user(text, now))?;
        let Some(pending) = self.simulator.schedule(id, now) else {
            return Ok(SubmitOutcome::IgnoredWaiting);
        };

        Ok(SubmitOutcome::Accepted {
            message_id,
            reply_due_at: pending.due_at,
        })
    }

    /// Replace the composing buffer.
    pub fn set_composing_text(&mut self, text: impl Into<String>) {
        self.composing_text = text.into();
    }

    /// Current composing buffer.
    #[must_use]
    pub fn composing_text(&self) -> &str {
        &self.composing_text
    }

    /// Submit the composing buffer to the selected conversation.
    ///
    /// The buffer is cleared only when the submission is accepted.
    ///
    /// # Errors
    /// Returns `NotFound` if the selected conversation vanished.
    pub fn submit_composed(&mut self) -> ChatResult<SubmitOutcome> {
        let text = std::mem::take(&mut self.composing_text);
        let outcome = self.submit(self.active_conversation_id, &text);
        if !matches!(outcome, Ok(SubmitOutcome::Accepted { .. })) {
            self.composing_text = text;
        }
        outcome
    }

    /// Whether a reply is pending for `id`.
    #[must_use]
    pub fn is_waiting_for_reply(&self, id: ConversationId) -> bool {
        self.simulator.is_pending(id)
    }

    /// Whether a reply is pending for the selected conversation.
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.is_waiting_for_reply(self.active_conversation_id)
    }

    /// Number of replies in flight across all conversations.
    #[must_use]
    pub fn pending_reply_count(&self) -> usize {
        self.simulator.pending_count()
    }

    /// Earliest due time among pending replies.
    #[must_use]
    pub fn next_reply_due(&self) -> Option<DateTime<Utc>> {
        self.simulator.next_due()
    }

    /// Append every reply whose delay has elapsed, earliest first.
    ///
    /// The reply is drawn from the conversation's category at delivery time,
    /// so a category switch while waiting is honoured.
    pub fn deliver_due_replies(&mut self) -> Vec<DeliveredReply> {
        let now = self.clock.now();
        let mut delivered = Vec::new();

        for pending in self.simulator.take_due(now) {
            let id = pending.conversation_id;
            let Some(category) = self.registry.get(id).map(Conversation::category) else {
                warn!(conversation = %id, "Dropping reply for unknown conversation");
                continue;
            };

            let message = self.simulator.compose_reply(category, now);
            match self.registry.append_message(id, message) {
                Ok(_) => {
                    info!(conversation = %id, %category, "Delivered reply");
                    // Report the message as stored, after timestamp clamping.
                    if let Some(stored) = self.registry.get(id).and_then(Conversation::last_message) {
                        delivered.push(DeliveredReply {
                            conversation_id: id,
                            message: stored.clone(),
                        });
                    }
                }
                Err(err) => warn!(conversation = %id, %err, "Failed to deliver reply"),
            }
        }

        delivered
    }

    /// Cancel the pending reply for `id`. Idempotent.
    pub fn cancel_reply(&mut self, id: ConversationId) -> bool {
        self.simulator.cancel(id)
    }

    /// Cancel every pending reply (view unmount). Idempotent.
    pub fn cancel_all_replies(&mut self) -> usize {
        let cancelled = self.simulator.cancel_all();
        if cancelled > 0 {
            info!(cancelled, "Cancelled pending replies");
        }
        cancelled
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            conversations: self.registry.summaries(),
            active_conversation_id: self.active_conversation_id,
            active_category: self.active_category,
            messages: self
                .active_conversation()
                .map(|c| c.messages().to_vec())
                .unwrap_or_default(),
            is_waiting_for_reply: self.is_waiting(),
            composing_text: self.composing_text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::core::errors::ChatError;
    use crate::chat::core::message::Sender;
    use crate::chat::ports::clock::ManualClock;
    use crate::chat::ports::random::{RngSource, ScriptedRandom};
    use crate::chat::registry::NEW_CONVERSATION_PREVIEW;
    use crate::chat::templates;
    use chrono::TimeZone;
    use std::time::Duration;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap()
    }

    fn session_with(random: Box<dyn RandomSource>) -> (ChatSession, ManualClock) {
        let clock = ManualClock::new(start());
        let session =
            ChatSession::new(ChatConfig::default(), Arc::new(clock.clone()), random).unwrap();
        (session, clock)
    }

    fn session() -> (ChatSession, ManualClock) {
        session_with(Box::new(RngSource::seeded(11)))
    }

    fn user_texts(session: &ChatSession, id: ConversationId) -> Vec<String> {
        session
            .registry()
            .get(id)
            .unwrap()
            .messages()
            .iter()
            .filter(|m| m.sender == Sender::User)
            .map(|m| m.content.clone())
            .collect()
    }

    #[test]
    fn test_fresh_sessions_are_structurally_equal() {
        let (a, _) = session();
        let (b, _) = session_with(Box::new(RngSource::seeded(99)));
        assert_eq!(a.conversations(), b.conversations());
        assert_eq!(a.view(), b.view());
    }

    #[test]
    fn test_new_session_selects_first_seed() {
        let (session, _) = session();
        let first = &session.conversations()[0];
        assert_eq!(session.active_conversation_id(), first.id());
        assert_eq!(session.active_category(), first.category());
        assert!(!session.is_waiting());
    }

    #[test]
    fn test_user_messages_keep_submission_order() {
        let (mut session, clock) = session();
        let id = session.active_conversation_id();
        let before = user_texts(&session, id);

        for text in ["first", "  second  ", "third"] {
            assert!(session.submit(id, text).unwrap().is_accepted());
            clock.advance(Duration::from_secs(3));
            assert_eq!(session.deliver_due_replies().len(), 1);
        }

        let after = user_texts(&session, id);
        assert_eq!(&after[before.len()..], ["first", "  second  ", "third"]);
    }

    #[test]
    fn test_only_one_reply_in_flight() {
        let (mut session, clock) = session();
        let id = session.active_conversation_id();
        let count = session.registry().get(id).unwrap().messages().len();

        assert!(session.submit(id, "a").unwrap().is_accepted());
        assert_eq!(session.submit(id, "b").unwrap(), SubmitOutcome::IgnoredWaiting);
        assert_eq!(session.pending_reply_count(), 1);

        let messages = session.registry().get(id).unwrap().messages();
        assert_eq!(messages.len(), count + 1);
        assert_eq!(messages[count].content, "a");

        clock.advance(Duration::from_millis(2500));
        let delivered = session.deliver_due_replies();
        assert_eq!(delivered.len(), 1);
        assert!(session.deliver_due_replies().is_empty());

        let messages = session.registry().get(id).unwrap().messages();
        assert_eq!(messages.len(), count + 2);
        assert_eq!(messages[count + 1].sender, Sender::Assistant);
        assert!(!session.is_waiting_for_reply(id));
    }

    #[test]
    fn test_reply_not_delivered_before_delay() {
        let (mut session, clock) =
            session_with(Box::new(ScriptedRandom::new([0], [2000])));
        let id = session.active_conversation_id();

        session.submit(id, "status?").unwrap();
        clock.advance(Duration::from_millis(1999));
        assert!(session.deliver_due_replies().is_empty());
        assert!(session.is_waiting());

        clock.advance(Duration::from_millis(1));
        let delivered = session.deliver_due_replies();
        assert_eq!(delivered.len(), 1);
        assert_eq!(
            delivered[0].message.content,
            templates::reply_pool(session.active_category())[0]
        );
    }

    #[test]
    fn test_reply_comes_from_conversation_category() {
        let (mut session, clock) = session();
        let personal = session
            .conversations()
            .iter()
            .find(|c| c.category() == Category::Personal)
            .unwrap()
            .id();

        session.submit(personal, "what's next?").unwrap();
        clock.advance(Duration::from_secs(3));
        let delivered = session.deliver_due_replies();

        let reply = &delivered[0].message;
        assert_eq!(reply.category, Some(Category::Personal));
        assert!(templates::reply_pool(Category::Personal).contains(&reply.content.as_str()));
    }

    #[test]
    fn test_blank_submission_is_ignored() {
        let (mut session, _) = session();
        let id = session.active_conversation_id();
        let count = session.registry().get(id).unwrap().messages().len();

        assert_eq!(session.submit(id, "").unwrap(), SubmitOutcome::IgnoredEmpty);
        assert_eq!(session.submit(id, " \t\n").unwrap(), SubmitOutcome::IgnoredEmpty);
        assert_eq!(session.registry().get(id).unwrap().messages().len(), count);
        assert!(!session.is_waiting());
    }

    #[test]
    fn test_submit_to_unknown_conversation_fails() {
        let (mut session, _) = session();
        let err = session.submit(ConversationId::from_u128(42), "hi").unwrap_err();
        assert!(matches!(err, ChatError::NotFound(_)));
    }

    #[test]
    fn test_replies_in_different_conversations_are_independent() {
        let (mut session, clock) = session();
        let a = session.conversations()[0].id();
        let b = session.conversations()[1].id();

        assert!(session.submit(a, "one").unwrap().is_accepted());
        assert!(session.submit(b, "two").unwrap().is_accepted());

        clock.advance(Duration::from_secs(3));
        let delivered: Vec<ConversationId> = session
            .deliver_due_replies()
            .iter()
            .map(|d| d.conversation_id)
            .collect();
        assert_eq!(delivered.len(), 2);
        assert!(delivered.contains(&a) && delivered.contains(&b));
    }

    #[test]
    fn test_switch_category_appends_announcement() {
        let (mut session, _) = session();
        let id = session.active_conversation_id();
        let target = session.active_category().other();

        session.switch_category(id, target).unwrap();

        let conversation = session.registry().get(id).unwrap();
        let last = conversation.last_message().unwrap();
        assert_eq!(last.sender, Sender::Assistant);
        assert_eq!(last.category, Some(target));
        assert_eq!(conversation.category(), target);
        assert_eq!(session.active_category(), target);
    }

    #[test]
    fn test_switch_inactive_conversation_keeps_active_category() {
        let (mut session, _) = session();
        let active_category = session.active_category();
        let other = session.conversations()[1].id();

        session.switch_category(other, active_category.other()).unwrap();
        assert_eq!(session.active_category(), active_category);
    }

    #[test]
    fn test_switch_while_waiting_replies_in_new_category() {
        let (mut session, clock) = session();
        let id = session.active_conversation_id();
        let target = session.active_category().other();

        session.submit(id, "hello").unwrap();
        session.switch_category(id, target).unwrap();
        clock.advance(Duration::from_secs(3));
        session.deliver_due_replies();

        let conversation = session.registry().get(id).unwrap();
        assert_eq!(conversation.last_message().unwrap().category, Some(target));
        assert_eq!(conversation.category(), target);
    }

    #[test]
    fn test_create_conversation_goes_first_and_is_active() {
        let (mut session, _) = session();
        let before: Vec<ConversationId> = session.conversations().iter().map(Conversation::id).collect();

        let created = session.create_conversation(Category::Personal);

        let after: Vec<ConversationId> = session.conversations().iter().map(Conversation::id).collect();
        assert_eq!(after[0], created);
        assert_eq!(&after[1..], before.as_slice());
        assert_eq!(session.active_conversation_id(), created);
        assert_eq!(session.active_category(), Category::Personal);
        assert_eq!(
            session.active_conversation().unwrap().last_message_preview(),
            NEW_CONVERSATION_PREVIEW
        );
    }

    #[test]
    fn test_start_new_conversation_uses_active_category() {
        let (mut session, _) = session();
        let personal = session
            .conversations()
            .iter()
            .find(|c| c.category() == Category::Personal)
            .unwrap()
            .id();
        session.select_conversation(personal).unwrap();

        let created = session.start_new_conversation();
        assert_eq!(
            session.registry().get(created).unwrap().category(),
            Category::Personal
        );
    }

    #[test]
    fn test_select_unknown_conversation_fails() {
        let (mut session, _) = session();
        let active = session.active_conversation_id();
        assert!(session.select_conversation(ConversationId::from_u128(5)).is_err());
        assert_eq!(session.active_conversation_id(), active);
    }

    #[test]
    fn test_preview_truncation_on_submit() {
        let (mut session, _) = session();
        let id = session.active_conversation_id();
        let long = "b".repeat(70);

        session.submit(id, &long).unwrap();
        assert_eq!(
            session.registry().get(id).unwrap().last_message_preview(),
            format!("{}...", "b".repeat(50))
        );
    }

    #[test]
    fn test_cancel_before_delivery_drops_reply() {
        let (mut session, clock) = session();
        let id = session.active_conversation_id();
        let count = session.registry().get(id).unwrap().messages().len();

        session.submit(id, "cancel me").unwrap();
        assert_eq!(session.cancel_all_replies(), 1);
        assert_eq!(session.cancel_all_replies(), 0);
        assert!(!session.cancel_reply(id));
        assert!(!session.is_waiting());

        clock.advance(Duration::from_secs(10));
        assert!(session.deliver_due_replies().is_empty());
        assert_eq!(session.registry().get(id).unwrap().messages().len(), count + 1);
    }

    #[test]
    fn test_cancel_after_delivery_is_noop() {
        let (mut session, clock) = session();
        let id = session.active_conversation_id();

        session.submit(id, "hi").unwrap();
        clock.advance(Duration::from_secs(3));
        assert_eq!(session.deliver_due_replies().len(), 1);
        assert!(!session.cancel_reply(id));
    }

    #[test]
    fn test_next_reply_due_tracks_pending_replies() {
        let (mut session, clock) =
            session_with(Box::new(ScriptedRandom::new([], [2000, 1600])));
        let a = session.conversations()[0].id();
        let b = session.conversations()[1].id();
        assert_eq!(session.next_reply_due(), None);

        let SubmitOutcome::Accepted { reply_due_at, .. } = session.submit(a, "first").unwrap() else {
            panic!("submission was not accepted");
        };
        assert_eq!(session.next_reply_due(), Some(reply_due_at));
        assert_eq!(reply_due_at, start() + chrono::Duration::milliseconds(2000));

        let SubmitOutcome::Accepted { reply_due_at: sooner, .. } = session.submit(b, "second").unwrap() else {
            panic!("submission was not accepted");
        };
        assert_eq!(session.next_reply_due(), Some(sooner));

        session.cancel_reply(b);
        assert_eq!(session.next_reply_due(), Some(reply_due_at));

        clock.advance(Duration::from_millis(2000));
        assert_eq!(session.deliver_due_replies().len(), 1);
        assert_eq!(session.next_reply_due(), None);
    }

    #[test]
    fn test_clock_going_backwards_keeps_timestamps_ordered() {
        let (mut session, clock) =
            session_with(Box::new(ScriptedRandom::new([], [2000, 2000])));
        let id = session.active_conversation_id();
        let target = session.active_category().other();

        session.submit(id, "first").unwrap();
        clock.advance(Duration::from_millis(2000));
        assert_eq!(session.deliver_due_replies().len(), 1);
        let high_water = start() + chrono::Duration::milliseconds(2000);

        let earlier = start() - chrono::Duration::hours(1);
        clock.set(earlier);
        session.submit(id, "second").unwrap();
        session.switch_category(id, target).unwrap();

        clock.set(earlier + chrono::Duration::milliseconds(2000));
        let delivered = session.deliver_due_replies();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].message.timestamp, high_water);

        let conversation = session.registry().get(id).unwrap();
        let messages = conversation.messages();
        for pair in messages.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
        for message in &messages[messages.len() - 3..] {
            assert_eq!(message.timestamp, high_water);
        }
        assert_eq!(conversation.last_activity(), high_water);
        assert_eq!(conversation.last_message().unwrap().category, Some(target));
    }

    #[test]
    fn test_append_rejects_foreign_assistant_message() {
        let (mut session, _) = session();
        let id = session.active_conversation_id();
        let category = session.active_category();

        let result = session.append_message(id, Message::assistant("rogue", category.other(), start()));
        assert!(matches!(result, Err(ChatError::CategoryMismatch { .. })));

        let conversation = session.registry().get(id).unwrap();
        assert_eq!(conversation.last_message().unwrap().category, Some(conversation.category()));
    }

    #[test]
    fn test_composed_text_cleared_only_on_accept() {
        let (mut session, _) = session();
        session.set_composing_text("   ");
        assert_eq!(session.submit_composed().unwrap(), SubmitOutcome::IgnoredEmpty);
        assert_eq!(session.composing_text(), "   ");

        session.set_composing_text("Prep notes for Acme");
        assert!(session.submit_composed().unwrap().is_accepted());
        assert_eq!(session.composing_text(), "");

        session.set_composing_text("follow-up");
        assert_eq!(session.submit_composed().unwrap(), SubmitOutcome::IgnoredWaiting);
        assert_eq!(session.composing_text(), "follow-up");
    }

    #[test]
    fn test_view_reflects_active_conversation() {
        let (mut session, _) = session();
        let id = session.active_conversation_id();
        session.submit(id, "hello").unwrap();

        let view = session.view();
        assert_eq!(view.active_conversation_id, id);
        assert!(view.is_waiting_for_reply);
        assert_eq!(view.messages.last().unwrap().content, "hello");
        assert_eq!(view.conversations.len(), session.conversations().len());
    }

    #[test]
    fn test_empty_conversation_list_gets_fresh_conversation() {
        let clock = ManualClock::new(start());
        let session = ChatSession::with_conversations(
            ChatConfig::default(),
            Arc::new(clock),
            Box::new(RngSource::seeded(1)),
            Vec::new(),
        )
        .unwrap();
        assert_eq!(session.conversations().len(), 1);
        assert_eq!(session.active_category(), Category::Company);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ChatConfig {
            preview_max_chars: 0,
            ..ChatConfig::default()
        };
        let result = ChatSession::new(
            config,
            Arc::new(ManualClock::new(start())),
            Box::new(RngSource::seeded(1)),
        );
        assert!(matches!(result, Err(ChatError::InvalidConfig(_))));
    }
}
