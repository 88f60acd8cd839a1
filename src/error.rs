// Error types for the kiosk application.
// Covers transport failures, upstream API errors, and local storage faults.

use thiserror::Error;

use crate::cache::StorageError;

#[derive(Error, Debug)]
pub enum KioskError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream error (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("invalid API key, check your credentials")]
    InvalidKey,

    #[error("API rate limit exceeded, try again later")]
    RateLimited,

    #[error("no API key configured")]
    MissingKey,

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, KioskError>;
