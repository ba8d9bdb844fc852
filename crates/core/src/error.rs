//! Error types for the CDP support chatbot.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, corpus loading, retrieval, prompt
//! rendering, and the generation collaborator.

use thiserror::Error;

/// Unified error type for the CDP support chatbot.
///
/// All fallible functions in the application return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing API key, bad config file).
    /// Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generation collaborator errors. Caught at the orchestrator boundary
    /// and converted to the user-facing apology text; never shown raw.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Corpus store errors other than a corrupt snapshot
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// The documentation snapshot exists on disk but cannot be parsed.
    /// Startup-fatal; deleting the snapshot forces regeneration.
    #[error("Corrupt documentation snapshot: {0}")]
    CorruptCache(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
