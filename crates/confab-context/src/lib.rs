pub mod window;

pub use window::{ContextWindow, Exchange, HISTORY_MAX_LENGTH};
