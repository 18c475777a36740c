use async_trait::async_trait;

use crate::error::Result;
use crate::types::ContextEntry;

/// Boundary abstraction over the remote text-completion call.
///
/// Callers treat every failure uniformly; the error variant is never
/// inspected for control flow.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Ask the completion service for a reply to `message`, replaying
    /// `history` as conversational memory. Implementations normalize the
    /// reply before returning it.
    async fn complete(&self, message: &str, history: &[ContextEntry]) -> Result<String>;
}
