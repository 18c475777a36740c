use thiserror::Error;

/// Local validation failures surfaced to the caller.
///
/// Gateway and storage failures never appear here: the controller absorbs
/// them into the transcript and the log respectively.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("message text is empty")]
    EmptyMessage,

    #[error("a completion request is already in flight")]
    Busy,

    #[error("only the most recent user message can be edited")]
    NotEditable,
}

pub type Result<T> = std::result::Result<T, SessionError>;
