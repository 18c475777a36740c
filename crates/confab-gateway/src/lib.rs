pub mod error;
pub mod http;
pub mod reply;
pub mod traits;
pub mod types;

pub use error::{GatewayError, Result};
pub use http::HttpGateway;
pub use reply::{ChatRequest, ChatResponse, ReplyPayload};
pub use traits::CompletionGateway;
pub use types::{ContextEntry, Role};
