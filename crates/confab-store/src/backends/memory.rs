use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::ConversationRecord;
use crate::store::ConversationStore;

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<ConversationRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn load(&self) -> Result<Vec<ConversationRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn save_all(&self, records: &[ConversationRecord]) -> Result<()> {
        *self.records.write().await = records.to_vec();
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.records.write().await.clear();
        Ok(())
    }
}
