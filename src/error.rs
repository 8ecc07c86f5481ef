//! Error types for the analytics pipeline

use std::path::PathBuf;

/// Result type for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Error types for analyzer operations
#[derive(thiserror::Error, Debug)]
pub enum AnalyzerError {
    #[error("Cannot load library {path}: {reason}")]
    FatalInput { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed duration: {0:?}")]
    MalformedDuration(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AnalyzerError {
    pub fn fatal_input(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::FatalInput {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
