//! Publish error types

use thiserror::Error;

use crate::types::ReleaseStatus;

/// Result type for publish operations
pub type Result<T> = std::result::Result<T, PublishError>;

/// Publishing-related errors
#[derive(Debug, Error)]
pub enum PublishError {
    /// Release status string not one of the four accepted values
    #[error("Invalid release status '{0}' (expected one of: completed, draft, halted, inProgress)")]
    InvalidStatus(String),

    /// Rollout fraction supplied for a status that forbids one
    #[error("Status '{status}' does not accept a rollout fraction")]
    IncompatibleStatusOption { status: ReleaseStatus },

    /// Rollout fraction missing for a status that requires one
    #[error("Status '{status}' requires a rollout fraction")]
    MissingRequiredOption { status: ReleaseStatus },

    /// Numeric option outside its accepted range
    #[error("{field} out of range: {value} (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Edit creation rejected by the service
    #[error("Failed to create edit: {0}")]
    EditCreationFailed(String),

    /// Requested track absent from the service's track list
    #[error("Track '{track}' not found (available tracks: {})", .available.join(", "))]
    TrackNotFound { track: String, available: Vec<String> },

    /// Commit rejected, or accepted without a usable commit id
    #[error("Commit failed: {status} - {message}")]
    CommitFailed { status: u16, message: String },

    /// Binary upload failed
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// API error from the service
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Invalid credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The overall publish wall-clock budget elapsed
    #[error("Publish timed out after {0} seconds")]
    Timeout(u64),

    /// Shared artifact-model error
    #[error(transparent)]
    Core(#[from] gantry_core::CoreError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JWT error
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Zip error
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl PublishError {
    /// Whether the failure was caught locally before any remote mutation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidStatus(_)
                | Self::IncompatibleStatusOption { .. }
                | Self::MissingRequiredOption { .. }
                | Self::OutOfRange { .. }
        )
    }
}
