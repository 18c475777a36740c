use async_trait::async_trait;

use crate::error::Result;
use crate::models::ConversationRecord;

/// Durable storage for the conversation history collection.
///
/// Implementations store and retrieve whole snapshots handed to them;
/// they never mutate records. Absent or malformed data degrades to an
/// empty collection on load instead of failing, so a corrupt history can
/// never take the chat down.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Load every stored record, newest first.
    async fn load(&self) -> Result<Vec<ConversationRecord>>;

    /// Overwrite the full collection.
    async fn save_all(&self, records: &[ConversationRecord]) -> Result<()>;

    /// Remove all persisted records.
    async fn clear(&self) -> Result<()>;
}
