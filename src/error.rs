//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout the tracker.
//!
//! # Error Categories
//! - `ConnectionFailed`: Database connection errors (fatal at startup)
//! - `QueryFailed`: Statement execution errors (reported, menu continues)
//! - `InvalidInput`: Malformed connection parameters
//! - `EngineError`: Engine-specific database errors
//! - `ConfigError`: Configuration file or environment errors
//! - `Prompt`: The terminal (or answer script) can no longer supply input
//! - `Io`: Writing to the output failed
//!
//! Business-rule rejections ("Role ID does not exist!") are not errors; they
//! are reported through [`crate::actions::Outcome`].

use thiserror::Error;

/// Main error type for tracker operations
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Database connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Invalid input or missing required parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Engine-specific database error
    #[error("Engine error ({engine}): {detail}")]
    EngineError { engine: String, detail: String },

    /// Configuration error (file not found, invalid JSON, missing variables)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Prompting the user failed
    #[error("Prompt failed: {0}")]
    Prompt(String),

    /// Writing output failed
    #[error("Output failed: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    /// Convert error to a stable error code string
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectionFailed(_) => "CONNECTION_FAILED",
            Self::QueryFailed(_) => "QUERY_FAILED",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::EngineError { .. } => "ENGINE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::Prompt(_) => "PROMPT_FAILED",
            Self::Io(_) => "IO_ERROR",
        }
    }

    /// Whether the menu loop can keep going after this error
    ///
    /// Prompt and output failures mean no further input can be read or no
    /// result can be shown, so the loop stops.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Prompt(_) | Self::Io(_))
    }

    /// Get human-readable error message
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed(message.into())
    }

    /// Create a query failed error
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::QueryFailed(message.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an engine-specific error
    pub fn engine_error(engine: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::EngineError { engine: engine.into(), detail: detail.into() }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a prompt error
    pub fn prompt(message: impl Into<String>) -> Self {
        Self::Prompt(message.into())
    }
}

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;
