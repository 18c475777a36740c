// HTTP implementation of the completion gateway (direct reqwest, no SDK).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

use crate::error::{GatewayError, Result};
use crate::reply::{ChatRequest, ChatResponse};
use crate::traits::CompletionGateway;
use crate::types::ContextEntry;

/// Gateway that talks to the chat proxy over HTTP.
pub struct HttpGateway {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpGateway {
    /// Create a gateway for the proxy at `base_url` (e.g. `http://localhost:3000`).
    ///
    /// No request timeout is applied; the call resolves or rejects per the
    /// transport's own behavior. Use [`HttpGateway::with_timeout`] to close
    /// that gap.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::build(base_url, None)
    }

    /// Same as [`HttpGateway::new`] with a per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::build(base_url, Some(timeout))
    }

    fn build(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let base_url = base_url.into();
        Ok(Self {
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
            http_client,
        })
    }
}

#[async_trait]
impl CompletionGateway for HttpGateway {
    async fn complete(&self, message: &str, history: &[ContextEntry]) -> Result<String> {
        let request = ChatRequest::new(message, history.to_vec());

        tracing::debug!(entries = history.len(), "sending completion request");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        let payload: ChatResponse = serde_json::from_str(&raw)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(payload.reply.into_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_joined_without_duplicate_slash() {
        let gateway = HttpGateway::new("http://localhost:3000/").unwrap();
        assert_eq!(gateway.endpoint, "http://localhost:3000/api/chat");
    }
}
