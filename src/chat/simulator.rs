//! Simulated assistant replies.
//!
//! Stands in for a real inference backend: every accepted submission gets one
//! canned reply from the conversation's category pool after a random delay.
//! At most one reply is in flight per conversation.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::chat::core::category::Category;
use crate::chat::core::config::ChatConfig;
use crate::chat::core::ids::ConversationId;
use crate::chat::core::message::Message;
use crate::chat::ports::random::RandomSource;
use crate::chat::templates;

/// A reply waiting for its delay to elapse.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct PendingReply {
    /// Conversation the reply belongs to.
    pub conversation_id: ConversationId,
    /// When the reply was scheduled.
    pub scheduled_at: DateTime<Utc>,
    /// Earliest delivery time.
    pub due_at: DateTime<Utc>,
    #[serde(skip)]
    seq: u64,
}

/// Canned reply generator with per-conversation backpressure.
pub struct ReplySimulator {
    random: Box<dyn RandomSource>,
    delay_min_ms: u64,
    delay_max_ms: u64,
    pending: HashMap<ConversationId, PendingReply>,
    next_seq: u64,
}

impl std::fmt::Debug for ReplySimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplySimulator")
            .field("delay_min_ms", &self.delay_min_ms)
            .field("delay_max_ms", &self.delay_max_ms)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl ReplySimulator {
    /// Create a simulator drawing from `random`.
    #[must_use]
    pub fn new(config: &ChatConfig, random: Box<dyn RandomSource>) -> Self {
        Self {
            random,
            delay_min_ms: config.reply_delay_min_ms,
            delay_max_ms: config.reply_delay_max_ms,
            pending: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Schedule a reply for `conversation_id`.
    ///
    /// Returns `None` without drawing anything if one is already pending.
    pub fn schedule(
        &mut self,
        conversation_id: ConversationId,
        now: DateTime<Utc>,
    ) -> Option<PendingReply> {
        if self.pending.contains_key(&conversation_id) {
            debug!(conversation = %conversation_id, "Reply already pending; not scheduling");
            return None;
        }

        let delay_ms = self
            .random
            .between_millis(self.delay_min_ms, self.delay_max_ms);
        let delay = Duration::milliseconds(i64::try_from(delay_ms).unwrap_or(i64::MAX));
        let reply = PendingReply {
            conversation_id,
            scheduled_at: now,
            due_at: now + delay,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending.insert(conversation_id, reply);

        debug!(conversation = %conversation_id, delay_ms, "Scheduled reply");
        Some(reply)
    }

    /// Whether a reply is pending for `conversation_id`.
    #[must_use]
    pub fn is_pending(&self, conversation_id: ConversationId) -> bool {
        self.pending.contains_key(&conversation_id)
    }

    /// Pending reply for `conversation_id`, if any.
    #[must_use]
    pub fn pending_for(&self, conversation_id: ConversationId) -> Option<&PendingReply> {
        self.pending.get(&conversation_id)
    }

    /// Number of pending replies.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Earliest due time among pending replies.
    #[must_use]
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.pending.values().map(|p| p.due_at).min()
    }

    /// Drop the pending reply for `conversation_id`. Idempotent.
    pub fn cancel(&mut self, conversation_id: ConversationId) -> bool {
        let cancelled = self.pending.remove(&conversation_id).is_some();
        if cancelled {
            debug!(conversation = %conversation_id, "Cancelled pending reply");
        }
        cancelled
    }

    /// Drop every pending reply. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    /// Remove and return replies due at `now`, earliest first.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<PendingReply> {
        let mut due: Vec<PendingReply> = self
            .pending
            .values()
            .filter(|p| p.due_at <= now)
            .copied()
            .collect();
        due.sort_by_key(|p| (p.due_at, p.seq));

        for reply in &due {
            self.pending.remove(&reply.conversation_id);
        }
        due
    }

    /// Draw a reply from the pool for `category`.
    pub fn compose_reply(&mut self, category: Category, now: DateTime<Utc>) -> Message {
        let pool = templates::reply_pool(category);
        let index = self.random.index(pool.len());
        let content = pool.get(index).copied().unwrap_or_default();
        Message::assistant(content, category, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ports::random::{RngSource, ScriptedRandom};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap()
    }

    fn scripted(indices: Vec<usize>, delays: Vec<u64>) -> ReplySimulator {
        ReplySimulator::new(
            &ChatConfig::default(),
            Box::new(ScriptedRandom::new(indices, delays)),
        )
    }

    #[test]
    fn test_schedule_uses_drawn_delay() {
        let mut simulator = scripted(vec![], vec![1800]);
        let id = ConversationId::from_u128(1);

        let reply = simulator.schedule(id, now()).unwrap();
        assert_eq!(reply.due_at, now() + Duration::milliseconds(1800));
        assert!(simulator.is_pending(id));
        assert_eq!(simulator.next_due(), Some(reply.due_at));
    }

    #[test]
    fn test_second_schedule_is_rejected() {
        let mut simulator = scripted(vec![], vec![1600, 2400]);
        let id = ConversationId::from_u128(1);

        assert!(simulator.schedule(id, now()).is_some());
        assert!(simulator.schedule(id, now()).is_none());
        assert_eq!(simulator.pending_count(), 1);
        assert_eq!(
            simulator.pending_for(id).map(|p| p.due_at),
            Some(now() + Duration::milliseconds(1600))
        );
    }

    #[test]
    fn test_take_due_orders_by_due_time() {
        let mut simulator = scripted(vec![], vec![2400, 1600]);
        let a = ConversationId::from_u128(1);
        let b = ConversationId::from_u128(2);
        simulator.schedule(a, now());
        simulator.schedule(b, now());

        assert!(simulator.take_due(now() + Duration::milliseconds(1000)).is_empty());

        let due = simulator.take_due(now() + Duration::milliseconds(3000));
        let order: Vec<ConversationId> = due.iter().map(|p| p.conversation_id).collect();
        assert_eq!(order, vec![b, a]);
        assert_eq!(simulator.pending_count(), 0);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut simulator = scripted(vec![], vec![]);
        let id = ConversationId::from_u128(1);
        simulator.schedule(id, now());

        assert!(simulator.cancel(id));
        assert!(!simulator.cancel(id));
        assert_eq!(simulator.cancel_all(), 0);
        assert!(simulator.take_due(now() + Duration::days(1)).is_empty());
    }

    #[test]
    fn test_compose_reply_draws_from_category_pool() {
        let mut simulator = scripted(vec![2], vec![]);
        let reply = simulator.compose_reply(Category::Personal, now());
        assert_eq!(reply.content, templates::reply_pool(Category::Personal)[2]);
        assert_eq!(reply.category, Some(Category::Personal));
    }

    #[test]
    fn test_random_delays_stay_in_configured_range() {
        let mut simulator =
            ReplySimulator::new(&ChatConfig::default(), Box::new(RngSource::seeded(3)));
        for n in 0..50 {
            let id = ConversationId::from_u128(n);
            let reply = simulator.schedule(id, now()).unwrap();
            let delay = (reply.due_at - now()).num_milliseconds();
            assert!((1500..=2500).contains(&delay));
        }
    }
}
