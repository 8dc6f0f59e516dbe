//! The edit-service capability

use std::path::Path;

use gantry_core::Artifact;

use crate::error::Result;
use crate::types::Track;

/// The narrow slice of the Play Developer API the orchestrator depends on.
///
/// Keeping this surface small makes the transaction logic testable against a
/// recording fake; [`crate::http::AndroidPublisher`] is the production
/// implementation.
#[async_trait::async_trait]
pub trait EditService: Send + Sync {
    /// Create a new edit, returning its opaque id
    async fn create_edit(&self) -> Result<String>;

    /// List the track names the service knows for this application
    async fn list_tracks(&self, edit_id: &str) -> Result<Vec<String>>;

    /// Upload an artifact into the edit
    ///
    /// Returns the version code the service assigned, or 0 when the
    /// response carried no usable code.
    async fn upload_artifact(&self, edit_id: &str, artifact: &Artifact) -> Result<i64>;

    /// Upload a ProGuard/R8 mapping file for an uploaded version code
    async fn upload_mapping_file(
        &self,
        edit_id: &str,
        version_code: i64,
        path: &Path,
    ) -> Result<()>;

    /// Upload a native-debug-symbols zip for an uploaded version code
    async fn upload_debug_symbols(
        &self,
        edit_id: &str,
        version_code: i64,
        payload: Vec<u8>,
    ) -> Result<()>;

    /// Replace a track's release list
    async fn update_track(&self, edit_id: &str, track: &Track) -> Result<()>;

    /// Commit the edit, returning the commit id the service reports
    async fn commit_edit(&self, edit_id: &str, changes_not_sent_for_review: bool)
        -> Result<String>;

    /// Upload an artifact to internal app sharing, returning its download URL
    ///
    /// Bypasses the edit model entirely; each call is independently terminal.
    async fn upload_internal_sharing(&self, artifact: &Artifact) -> Result<String>;
}
