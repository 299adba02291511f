//! Error types for the motion engine.
//!
//! The inference passes themselves never fail; these errors only come out
//! of configuration loading and document parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for motion engine operations.
pub type MotionResult<T> = Result<T, MotionError>;

/// Errors that can occur while preparing a motion analysis run.
#[derive(Debug, Error)]
pub enum MotionError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Model error: {0}")]
    Model(#[from] sportai_models::ModelError),
}

impl MotionError {
    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
