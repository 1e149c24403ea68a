//! Error types for smart-planner.

use thiserror::Error;

/// Result type alias using smart-planner's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for smart-planner operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Model call failed (unreachable, non-2xx, undecodable envelope)
    #[error("Inference error: {0}")]
    Inference(String),

    /// No JSON object could be located in the model output
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// A JSON object was located but is malformed or fails validation.
    ///
    /// `candidate` is the cleaned text that was handed to the JSON parser.
    #[error("Parse error: {reason}")]
    Parse { reason: String, candidate: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Authentication failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
