//! The publishing transaction orchestrator
//!
//! Drives one publish invocation end to end: validate the release
//! configuration locally, expand artifact patterns, then either upload every
//! artifact to internal app sharing or run the transactional path (acquire
//! edit, validate track, upload artifacts and deobfuscation files, write the
//! release to the track, commit).
//!
//! The first failure aborts the run. Nothing is retried and nothing is
//! rolled back; a failed transaction leaves the edit open server-side so an
//! operator can resume it with `existing_edit_id` or discard it.

use std::path::PathBuf;

use gantry_core::{locator, notes, Artifact, ArtifactKind, FailurePolicy, LocalizedNote};
use tracing::{debug, info, warn};

use crate::client::EditService;
use crate::config::PublishConfig;
use crate::error::{PublishError, Result};
use crate::symbols;
use crate::types::{PublishOutcome, ReleaseStatus, Track, TrackRelease};
use crate::validation::validate_release_config;

/// Publishing aborts on the first failed artifact; the edit is one
/// atomic unit and partial output would misrepresent it.
pub const FAILURE_POLICY: FailurePolicy = FailurePolicy::AbortOnFirstFailure;

/// Publishing transaction orchestrator over an [`EditService`]
pub struct Publisher<S> {
    service: S,
}

impl<S: EditService> Publisher<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Publish the artifacts matching `patterns` according to `config`.
    ///
    /// The whole operation runs under `config.timeout`; elapsing it aborts
    /// the in-flight call and reports a timeout distinct from any service
    /// error.
    pub async fn publish(
        &self,
        config: &PublishConfig,
        patterns: &[String],
    ) -> Result<PublishOutcome> {
        let budget_secs = config.timeout.as_secs();
        match tokio::time::timeout(config.timeout, self.run(config, patterns)).await {
            Ok(result) => result,
            Err(_) => Err(PublishError::Timeout(budget_secs)),
        }
    }

    async fn run(&self, config: &PublishConfig, patterns: &[String]) -> Result<PublishOutcome> {
        let status = validate_release_config(config)?;

        let paths = locator::expand_patterns(patterns)?;
        if paths.is_empty() {
            return Err(gantry_core::CoreError::NoArtifactsFound(patterns.join(", ")).into());
        }

        info!(
            package = %config.package_name,
            track = %config.track,
            artifacts = paths.len(),
            "starting publish"
        );

        if config.is_internal_sharing() {
            return self.share_internally(&paths).await;
        }

        self.run_transaction(config, status, &paths).await
    }

    /// Direct per-file uploads; no edit exists in this mode.
    ///
    /// The first failure aborts and discards URLs already collected: there
    /// is no atomic unit here to partially satisfy.
    async fn share_internally(&self, paths: &[PathBuf]) -> Result<PublishOutcome> {
        let mut download_urls = Vec::with_capacity(paths.len());
        for path in paths {
            let artifact = Artifact::from_path(path)?;
            info!(artifact = %artifact.file_name(), "uploading to internal app sharing");
            let url = self.service.upload_internal_sharing(&artifact).await?;
            download_urls.push(url);
        }
        Ok(PublishOutcome::Shared { download_urls })
    }

    async fn run_transaction(
        &self,
        config: &PublishConfig,
        status: ReleaseStatus,
        paths: &[PathBuf],
    ) -> Result<PublishOutcome> {
        // Acquire the edit
        let edit_id = match &config.existing_edit_id {
            Some(id) => {
                info!(edit_id = %id, "resuming existing edit");
                id.clone()
            }
            None => {
                let id = self
                    .service
                    .create_edit()
                    .await
                    .map_err(|e| PublishError::EditCreationFailed(e.to_string()))?;
                info!(edit_id = %id, "created edit");
                id
            }
        };

        // Validate the track against what the service reports
        let available = match self.service.list_tracks(&edit_id).await {
            Ok(tracks) => tracks,
            Err(err) => {
                warn!(error = %err, "failed to list tracks");
                return Err(PublishError::TrackNotFound {
                    track: config.track.clone(),
                    available: Vec::new(),
                });
            }
        };
        if !available.iter().any(|t| t == &config.track) {
            return Err(PublishError::TrackNotFound {
                track: config.track.clone(),
                available,
            });
        }

        // Upload artifacts in input order
        let mut version_codes = Vec::with_capacity(paths.len());
        let mut warnings = Vec::new();
        for path in paths {
            let artifact = Artifact::from_path(path)?;
            info!(artifact = %artifact.file_name(), kind = %artifact.kind, "uploading artifact");
            let version_code = self.service.upload_artifact(&edit_id, &artifact).await?;
            debug!(artifact = %artifact.file_name(), version_code, "artifact uploaded");
            version_codes.push(version_code);

            if artifact.kind == ArtifactKind::Apk {
                self.upload_deobfuscation_files(
                    config,
                    &edit_id,
                    &artifact,
                    version_code,
                    &mut warnings,
                )
                .await;
            }
        }

        // Write the release to the track; codes with the 0 sentinel are
        // no-op uploads and stay out of the release
        let release_codes: Vec<i64> = version_codes.iter().copied().filter(|&c| c != 0).collect();
        let release = TrackRelease {
            name: config.release_name.clone(),
            version_codes: release_codes.iter().map(|c| c.to_string()).collect(),
            status,
            user_fraction: config.user_fraction,
            in_app_update_priority: config.update_priority,
            release_notes: self.resolve_release_notes(config).await?,
        };
        let track = Track {
            track: config.track.clone(),
            releases: vec![release],
        };
        info!(track = %config.track, codes = ?release_codes, "updating track");
        self.service.update_track(&edit_id, &track).await?;

        // Commit; success means a non-empty commit id
        let commit_id = match self
            .service
            .commit_edit(&edit_id, config.changes_not_sent_for_review)
            .await
        {
            Ok(id) if id.is_empty() => {
                return Err(PublishError::CommitFailed {
                    status: 200,
                    message: "service returned no commit id".to_string(),
                })
            }
            Ok(id) => id,
            Err(PublishError::ApiError { status, message }) => {
                return Err(PublishError::CommitFailed { status, message })
            }
            Err(other) => return Err(other),
        };
        info!(edit_id = %edit_id, commit_id = %commit_id, "edit committed");

        Ok(PublishOutcome::Committed {
            edit_id,
            commit_id,
            version_codes: release_codes,
            warnings,
        })
    }

    /// Best-effort mapping-file and debug-symbols uploads after an APK.
    ///
    /// Absent options are skipped quietly; a failed upload is recorded as a
    /// warning and never fails the publish.
    async fn upload_deobfuscation_files(
        &self,
        config: &PublishConfig,
        edit_id: &str,
        artifact: &Artifact,
        version_code: i64,
        warnings: &mut Vec<String>,
    ) {
        if config.mapping_file.is_none() && config.debug_symbols.is_none() {
            return;
        }
        if version_code == 0 {
            warn!(
                artifact = %artifact.file_name(),
                "upload yielded no version code, skipping deobfuscation uploads"
            );
            warnings.push(format!(
                "{}: no version code, deobfuscation files not uploaded",
                artifact.file_name()
            ));
            return;
        }

        if let Some(mapping) = &config.mapping_file {
            match self
                .service
                .upload_mapping_file(edit_id, version_code, mapping)
                .await
            {
                Ok(()) => debug!(version_code, "uploaded mapping file"),
                Err(err) => {
                    warn!(version_code, error = %err, "mapping file upload failed");
                    warnings.push(format!(
                        "mapping file upload failed for version code {}: {}",
                        version_code, err
                    ));
                }
            }
        }

        if let Some(symbols_path) = &config.debug_symbols {
            let payload = match symbols::load_debug_symbols(symbols_path).await {
                Ok(payload) => payload,
                Err(err) => {
                    warn!(path = %symbols_path.display(), error = %err, "failed to read debug symbols");
                    warnings.push(format!(
                        "debug symbols unreadable at {}: {}",
                        symbols_path.display(),
                        err
                    ));
                    return;
                }
            };
            match self
                .service
                .upload_debug_symbols(edit_id, version_code, payload)
                .await
            {
                Ok(()) => debug!(version_code, "uploaded native debug symbols"),
                Err(err) => {
                    warn!(version_code, error = %err, "debug symbols upload failed");
                    warnings.push(format!(
                        "debug symbols upload failed for version code {}: {}",
                        version_code, err
                    ));
                }
            }
        }
    }

    /// Explicit caller-supplied notes win over the notes directory.
    async fn resolve_release_notes(&self, config: &PublishConfig) -> Result<Vec<LocalizedNote>> {
        if !config.release_notes.is_empty() {
            return Ok(config.release_notes.clone());
        }
        if let Some(dir) = &config.release_notes_dir {
            return Ok(notes::load_localized_notes(dir).await?);
        }
        Ok(Vec::new())
    }
}
