pub mod backends;
pub mod builder;
pub mod error;
pub mod models;
pub mod store;

pub use backends::json_file::COLLECTION_NAME;
pub use backends::{JsonFileStore, MemoryStore};
pub use builder::{build_record, generate_title, upsert_record, RecordDraft};
pub use builder::{DEFAULT_TITLE, HISTORY_LIMIT, TITLE_MAX_LENGTH};
pub use error::{Result, StoreError};
pub use models::{ChatMessage, ConversationRecord, Sender};
pub use store::ConversationStore;
