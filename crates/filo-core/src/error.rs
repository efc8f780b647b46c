//! Error types for filo

use thiserror::Error;

/// Result type alias using FiloError
pub type Result<T> = std::result::Result<T, FiloError>;

/// Error type alias for convenience
pub type Error = FiloError;

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const PARTIAL_FAILURE: i32 = 2;
}

/// Main error type for filo
#[derive(Debug, Error)]
pub enum FiloError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk directory error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Ollama service unavailable at {0}")]
    ServiceUnavailable(String),

    #[error("Model not installed: {0}")]
    ModelNotFound(String),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Batch not found: {0}")]
    BatchNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl FiloError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        exit_codes::GENERAL_ERROR
    }
}
