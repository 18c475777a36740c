use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed completion response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
