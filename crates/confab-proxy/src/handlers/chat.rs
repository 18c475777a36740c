use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use confab_gateway::{ContextEntry, Role};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<ContextEntry>>,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub timestamp: DateTime<Utc>,
}

/// Forward a chat message to the inference service and reshape the answer.
pub async fn send_chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequestBody>,
) -> ApiResult<Json<ChatReply>> {
    let message = body.message.as_deref().map(str::trim).unwrap_or_default();
    if message.is_empty() {
        return Err(ApiError::BadRequest("Message is required".to_string()));
    }

    let history = body.history.unwrap_or_default();
    let prompt = build_prompt(message, &history);

    let reply = state.upstream.complete(prompt).await.map_err(|e| {
        tracing::error!("completion forwarding failed: {e:#}");
        ApiError::Upstream(e.to_string())
    })?;

    Ok(Json(ChatReply {
        reply,
        timestamp: Utc::now(),
    }))
}

/// Preflight requests get an empty 200; the CORS layer adds the headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Fold prior turns into a single completion prompt.
fn build_prompt(message: &str, history: &[ContextEntry]) -> String {
    if history.is_empty() {
        return message.to_string();
    }

    let mut prompt = String::new();
    for entry in history {
        let speaker = match entry.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
        };
        prompt.push_str(speaker);
        prompt.push_str(": ");
        prompt.push_str(&entry.content);
        prompt.push('\n');
    }
    prompt.push_str("User: ");
    prompt.push_str(message);
    prompt.push_str("\nAssistant:");
    prompt
}
