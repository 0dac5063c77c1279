//! Canned assistant texts per category.
//!
//! Reply pools are disjoint between categories so a reply always reveals the
//! pool it came from. `**` pairs mark strong spans.

use crate::chat::core::category::Category;

const COMPANY_GREETING: &str = "Hi! I'm your **company assistant**. Ask me about past meetings, client \
commitments or action items across your engagements.";

const PERSONAL_GREETING: &str = "Hi! I'm your **personal assistant**. I can help with your own notes, \
schedule and follow-ups.";

const COMPANY_ANNOUNCEMENT: &str = "Switched to **Company** mode. I'll answer using your team's \
meetings, clients and shared documents.";

const PERSONAL_ANNOUNCEMENT: &str = "Switched to **Personal** mode. I'll answer using only your \
private notes and calendar.";

const COMPANY_REPLIES: [&str; 6] = [
    "Based on last week's client meetings, the main theme was **budget approval for Q3**. Three \
clients raised timeline concerns.",
    "I found **4 open action items** assigned to your team. The oldest is the revised proposal for \
Northwind, due Friday.",
    "Across recent calls, clients mentioned **data migration** most often. It may be worth a \
dedicated workshop.",
    "The Acme kickoff recording shows agreement on **a phased rollout**. Phase one starts next \
month.",
    "Your team's talk-time ratio averaged **38%** this month, down from 45%. Clients are doing more \
of the talking.",
    "I cross-referenced the engagement notes: **pricing** came up in 6 of the last 10 meetings, \
usually near the end.",
];

const PERSONAL_REPLIES: [&str; 6] = [
    "You have **3 meetings** tomorrow. The first one starts at 9:30 with the Contoso steering \
group.",
    "From your notes: you promised to **send the summary deck** to Maria by Thursday.",
    "You spent about **11 hours** in meetings this week, two fewer than last week.",
    "Your next free **90-minute block** is Wednesday afternoon. Want me to hold it for deep work?",
    "I drafted a **follow-up email** from your last call. It covers next steps and the open \
question on scope.",
    "Reminder: your **one-on-one** with your manager moved to Monday at 4pm.",
];

/// Greeting that seeds a freshly created conversation.
#[must_use]
pub const fn greeting(category: Category) -> &'static str {
    match category {
        Category::Company => COMPANY_GREETING,
        Category::Personal => PERSONAL_GREETING,
    }
}

/// Announcement appended when a conversation switches to `category`.
#[must_use]
pub const fn switch_announcement(category: Category) -> &'static str {
    match category {
        Category::Company => COMPANY_ANNOUNCEMENT,
        Category::Personal => PERSONAL_ANNOUNCEMENT,
    }
}

/// Canned replies available to `category`.
#[must_use]
pub const fn reply_pool(category: Category) -> &'static [&'static str] {
    match category {
        Category::Company => &COMPANY_REPLIES,
        Category::Personal => &PERSONAL_REPLIES,
    }
}
