//! Error types for the Tribune QA service.
//!
//! This module defines a unified error enum covering all error categories in
//! the application: configuration, I/O, LLM access, vector search, SQL
//! execution, caching, prompts, and request input.

use thiserror::Error;

/// Unified error type for the Tribune QA service.
///
/// All fallible functions in the application return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
///
/// Of these, only `Input` ever crosses the pipeline boundary to a caller;
/// every other variant is absorbed into a degraded-but-valid response by the
/// stage that observes it.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid request input (empty or all-whitespace query)
    #[error("Invalid input: {0}")]
    Input(String),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Vector search backend errors
    #[error("Search error: {0}")]
    Search(String),

    /// SQL store errors
    #[error("SQL error: {0}")]
    Sql(String),

    /// Response cache errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// Prompt rendering errors
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
