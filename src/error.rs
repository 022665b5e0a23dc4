// Error types for postdeck.
// Covers HTTP transport failures, store/cache IO, configuration, and id input validation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostdeckError {
    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PostdeckError>;

/// Rejected input in the post id search field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdInputError {
    #[error("not an integer")]
    NotInteger,

    #[error("must be positive")]
    NotPositive,
}
