//! Shared error types

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors shared by the publishing and signing pipelines
#[derive(Debug, Error)]
pub enum CoreError {
    /// File extension not recognized for any supported operation
    #[error("Unsupported artifact type: {path} (expected .apk or .aab)")]
    UnsupportedArtifact { path: PathBuf },

    /// No artifact matched the given patterns or directory
    #[error("No artifacts found matching {0}")]
    NoArtifactsFound(String),

    /// Malformed glob pattern
    #[error("Invalid artifact pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
