//! Error types for Scribe
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Scribe operations
///
/// Covers configuration loading, local storage access, session lookups
/// and calls to the generation endpoint.
#[derive(Error, Debug)]
pub enum ScribeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local storage errors (reading or writing the backing file)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generation endpoint errors (transport, timeout, non-success status)
    #[error("{0}")]
    Generation(String),

    /// No saved session has the requested identifier
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Theme name other than "light" or "dark"
    #[error("Invalid theme: {0}. Must be one of: light, dark")]
    InvalidTheme(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Scribe operations
///
/// Uses `anyhow::Error` so call sites can attach context while still
/// allowing `downcast_ref::<ScribeError>()` where the variant matters.
pub type Result<T> = anyhow::Result<T>;
