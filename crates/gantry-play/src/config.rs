//! Publish configuration

use std::path::PathBuf;
use std::time::Duration;

use gantry_core::LocalizedNote;

/// Wall-clock budget for one publish invocation unless overridden
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);

/// Pseudo-track that bypasses the edit model and uploads directly
pub const INTERNAL_SHARING_TRACK: &str = "internal-app-sharing";

/// Caller-facing configuration for one publish invocation
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Application package name (e.g. "com.example.app")
    pub package_name: String,

    /// Target track name
    pub track: String,

    /// Requested release status, validated before any remote call
    pub status: String,

    /// Staged-rollout fraction, required by halted/inProgress statuses
    pub user_fraction: Option<f64>,

    /// In-app update priority, 0 through 5
    pub update_priority: Option<i64>,

    /// Display name for the release
    pub release_name: Option<String>,

    /// Explicit release notes; take precedence over `release_notes_dir`
    pub release_notes: Vec<LocalizedNote>,

    /// Directory of per-locale release-notes files
    pub release_notes_dir: Option<PathBuf>,

    /// ProGuard/R8 mapping file uploaded alongside each APK
    pub mapping_file: Option<PathBuf>,

    /// Native debug symbols (zip file, or directory zipped before upload)
    pub debug_symbols: Option<PathBuf>,

    /// Resume a prior uncommitted edit instead of creating one
    pub existing_edit_id: Option<String>,

    /// Ask the service not to send committed changes for review
    pub changes_not_sent_for_review: bool,

    /// Overall wall-clock budget for the publish
    pub timeout: Duration,
}

impl PublishConfig {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            track: "internal".to_string(),
            status: "completed".to_string(),
            user_fraction: None,
            update_priority: None,
            release_name: None,
            release_notes: Vec::new(),
            release_notes_dir: None,
            mapping_file: None,
            debug_symbols: None,
            existing_edit_id: None,
            changes_not_sent_for_review: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Whether the configured track is the direct-upload pseudo-track
    pub fn is_internal_sharing(&self) -> bool {
        self.track.eq_ignore_ascii_case(INTERNAL_SHARING_TRACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PublishConfig::new("com.example.app");
        assert_eq!(config.track, "internal");
        assert_eq!(config.status, "completed");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(!config.changes_not_sent_for_review);
    }

    #[test]
    fn test_internal_sharing_detection_is_case_insensitive() {
        let mut config = PublishConfig::new("com.example.app");
        assert!(!config.is_internal_sharing());

        config.track = "internal-app-sharing".to_string();
        assert!(config.is_internal_sharing());

        config.track = "Internal-App-Sharing".to_string();
        assert!(config.is_internal_sharing());
    }
}
