use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ContextEntry;

/// Request body accepted by the chat proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<ContextEntry>>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, history: Vec<ContextEntry>) -> Self {
        Self {
            message: message.into(),
            history: if history.is_empty() {
                None
            } else {
                Some(history)
            },
        }
    }
}

/// Response body returned by the chat proxy.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub reply: ReplyPayload,

    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Shapes the `reply` field has been observed to arrive in.
///
/// The upstream inference service sometimes answers with a plain string,
/// sometimes with an array of fragments, and sometimes with a raw JSON
/// object. Normalization happens here, at the boundary, so callers only
/// ever see a single string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReplyPayload {
    Text(String),
    Fragments(Vec<String>),
    Structured(Value),
}

impl ReplyPayload {
    /// Collapse any observed reply shape into one display string.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Fragments(parts) => parts.join(" "),
            Self::Structured(Value::Null) => String::new(),
            Self::Structured(value) => value.to_string(),
        }
    }
}
