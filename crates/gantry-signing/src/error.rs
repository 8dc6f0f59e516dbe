//! Error types for signing operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for signing operations
pub type Result<T> = std::result::Result<T, SigningError>;

/// Signing-related errors
#[derive(Debug, Error)]
pub enum SigningError {
    /// No Android SDK installation could be located
    #[error("Android SDK not found. Set ANDROID_HOME or ANDROID_SDK_ROOT")]
    SdkNotFound,

    /// The versioned build-tools directory is missing
    #[error("Build-tools directory not found: {dir}")]
    ToolchainNotFound { dir: PathBuf },

    /// A required signing executable is missing
    #[error("Signing tool not found: {tool}. {hint}")]
    ToolNotFound { tool: String, hint: String },

    /// Tool execution returned a non-zero exit
    #[error("Signing tool failed: {tool} - {reason}")]
    ToolFailed { tool: String, reason: String },

    /// The signed output did not verify
    #[error("Signature verification failed for {path}: {reason}")]
    VerificationFailed { path: PathBuf, reason: String },

    /// Shared artifact-model error
    #[error(transparent)]
    Core(#[from] gantry_core::CoreError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
