//! Error types for va-core

use thiserror::Error;

/// Main error type for va-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("LLM API error: {0}")]
    LlmApi(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Agent runtime error: {0}")]
    Runtime(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for va-core
pub type Result<T> = std::result::Result<T, Error>;
