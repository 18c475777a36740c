use chrono::{DateTime, Utc};
use confab_context::Exchange;
use serde::{Deserialize, Serialize};

use super::message::ChatMessage;

/// Durable snapshot of one chat thread.
///
/// Records are produced by the builder and only ever stored or retrieved
/// whole; the store never mutates them. `context_history` mirrors
/// `messages` but holds what is actually replayed to the completion
/// service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub context_history: Vec<Exchange>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: usize,
}
