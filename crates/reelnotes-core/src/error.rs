//! Error type shared by every reelnotes crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A looked-up resource other than a note is missing.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Note not found: {0}")]
    NoteNotFound(i64),

    /// The completion endpoint failed or replied with something unusable.
    #[error("Inference error: {0}")]
    Inference(String),

    /// The reel scraper or oEmbed lookup failed.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// A payload could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Missing or rejected deployment settings such as API keys or model names.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-supplied data was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport-level HTTP failure.
    #[error("Request error: {0}")]
    Request(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        // Scraper URLs embed the reel URL; keep messages short
        let e = e.without_url();
        if e.is_timeout() {
            Error::Request(format!("timed out: {}", e))
        } else {
            Error::Request(e.to_string())
        }
    }
}
