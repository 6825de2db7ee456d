//! Error types for chunkwise.
//!
//! This module defines a unified error enum that covers every error category
//! in the workspace: configuration, I/O, tokenization, splitting and
//! serialization.

use thiserror::Error;

/// Unified error type for chunkwise.
///
/// All fallible functions return `Result<T, AppError>`.
/// Errors are represented and propagated, never turned into panics.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tokenizer construction or invocation errors
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Document splitting errors
    #[error("Split error: {0}")]
    Split(String),

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
