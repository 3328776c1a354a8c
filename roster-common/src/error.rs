//! Common error types for the roster service

use thiserror::Error;

/// Common result type for roster operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the roster crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Row already exists (duplicate key)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Feed resource could not be read
    #[error("Feed error: {0}")]
    Feed(String),

    /// Feed resource returned no content
    #[error("Feed document is empty: {0}")]
    EmptyDocument(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
