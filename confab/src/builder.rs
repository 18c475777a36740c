use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use confab_context::HISTORY_MAX_LENGTH;
use confab_gateway::{CompletionGateway, HttpGateway};
use confab_session::SessionController;
use confab_store::{ConversationStore, JsonFileStore, MemoryStore};

/// Wires a gateway, a store and a controller together.
///
/// Defaults: in-memory history, the standard context cap, and no request
/// timeout (the transport's own behavior decides).
pub struct SessionBuilder {
    endpoint: Option<String>,
    history_file: Option<PathBuf>,
    max_context_entries: usize,
    request_timeout: Option<Duration>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            endpoint: None,
            history_file: None,
            max_context_entries: HISTORY_MAX_LENGTH,
            request_timeout: None,
        }
    }

    /// Base URL of the chat proxy, e.g. `http://localhost:3000`.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Persist conversations to this JSON file instead of keeping them
    /// in memory only.
    pub fn history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = Some(path.into());
        self
    }

    /// Cap on context entries replayed to the completion service.
    pub fn max_context_entries(mut self, entries: usize) -> Self {
        self.max_context_entries = entries;
        self
    }

    /// Apply a per-request timeout to gateway calls.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub async fn build(self) -> Result<SessionController> {
        let endpoint = self
            .endpoint
            .ok_or_else(|| anyhow::anyhow!("endpoint is required"))?;

        let gateway: Arc<dyn CompletionGateway> = match self.request_timeout {
            Some(timeout) => Arc::new(HttpGateway::with_timeout(endpoint, timeout)?),
            None => Arc::new(HttpGateway::new(endpoint)?),
        };

        let store: Arc<dyn ConversationStore> = match self.history_file {
            Some(path) => Arc::new(JsonFileStore::new(path)),
            None => Arc::new(MemoryStore::new()),
        };

        Ok(SessionController::with_context_capacity(gateway, store, self.max_context_entries).await)
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
