//! Error types for retrace-core

use thiserror::Error;

/// Main error type for the retrace-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Event store could not be reached (transient; caller may retry)
    #[error("event store unavailable: {0}")]
    StoreUnavailable(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Viewport string failed the WIDTHxHEIGHT shape or has non-positive dimensions
    #[error("invalid viewport: {0}")]
    InvalidViewport(String),

    /// Per-record normalization failure (soft; the assembler skips and counts it)
    #[error("normalization error: {message}")]
    Normalize { message: String },
}

/// Result type alias for retrace-core
pub type Result<T> = std::result::Result<T, Error>;
