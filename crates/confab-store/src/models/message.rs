use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One entry of the visible transcript.
///
/// Ids derive from the creation time in milliseconds; the session
/// controller bumps them to stay strictly monotonic, so two messages
/// created in the same millisecond never collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_regenerated: bool,
}

impl ChatMessage {
    pub fn user(id: u64, text: impl Into<String>) -> Self {
        Self::new(id, text, Sender::User)
    }

    pub fn assistant(id: u64, text: impl Into<String>) -> Self {
        Self::new(id, text, Sender::Assistant)
    }

    fn new(id: u64, text: impl Into<String>, sender: Sender) -> Self {
        Self {
            id,
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            is_regenerated: false,
        }
    }
}
