pub mod message;
pub mod record;

pub use message::{ChatMessage, Sender};
pub use record::ConversationRecord;
