//! # Confab - chat client core
//!
//! Confab is the engine of a browser-style chat client in Rust:
//! conversation sessions with optimistic sends, edit-and-regenerate,
//! durable local history, and a thin proxy gateway to a remote
//! text-completion service.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use confab::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut session = SessionBuilder::new()
//!         .endpoint("http://localhost:3000")
//!         .history_file("chat-histories.json")
//!         .build()
//!         .await?;
//!
//!     session.send_message("Hello!").await?;
//!     for message in session.messages() {
//!         println!("{:?}: {}", message.sender, message.text);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Confab consists of several composable crates:
//!
//! - **confab-gateway**: completion gateway trait + HTTP client with
//!   reply-shape normalization
//! - **confab-context**: bounded context window of user/assistant exchanges
//! - **confab-store**: durable conversation records, title derivation,
//!   history-limit eviction
//! - **confab-session**: the session state machine orchestrating them

pub mod builder;

pub use confab_context as context;
pub use confab_gateway as gateway;
pub use confab_session as session;
pub use confab_store as store;

pub use builder::SessionBuilder;

/// Everything needed for typical use.
pub mod prelude {
    pub use crate::builder::SessionBuilder;
    pub use confab_context::{ContextWindow, Exchange};
    pub use confab_gateway::{CompletionGateway, ContextEntry, GatewayError, HttpGateway, Role};
    pub use confab_session::{
        SessionController, SessionError, SessionEvent, SessionPhase, GATEWAY_ERROR_REPLY,
    };
    pub use confab_store::{
        ChatMessage, ConversationRecord, ConversationStore, JsonFileStore, MemoryStore, Sender,
    };
}
