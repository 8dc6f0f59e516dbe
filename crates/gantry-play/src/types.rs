//! Wire types for the Play Developer API edits model

use std::str::FromStr;

use gantry_core::LocalizedNote;
use serde::{Deserialize, Serialize};

use crate::error::PublishError;

/// Status of a release on a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReleaseStatus {
    /// Fully rolled out to the track
    Completed,
    /// Staged but not visible to users
    Draft,
    /// Staged rollout stopped at its current fraction
    Halted,
    /// Staged rollout in progress
    InProgress,
}

impl ReleaseStatus {
    /// The exact strings the service accepts
    pub const ALL: [&'static str; 4] = ["completed", "draft", "halted", "inProgress"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Draft => "draft",
            Self::Halted => "halted",
            Self::InProgress => "inProgress",
        }
    }

    /// Staged-rollout statuses carry a user fraction; the others must not
    pub fn requires_fraction(&self) -> bool {
        matches!(self, Self::Halted | Self::InProgress)
    }
}

impl FromStr for ReleaseStatus {
    type Err = PublishError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(Self::Completed),
            "draft" => Ok(Self::Draft),
            "halted" => Ok(Self::Halted),
            "inProgress" => Ok(Self::InProgress),
            other => Err(PublishError::InvalidStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One release within a track, as sent on track update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRelease {
    /// Display name for the release
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Version codes in this release; the service expects decimal strings
    pub version_codes: Vec<String>,

    pub status: ReleaseStatus,

    /// Fraction of users receiving a staged rollout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_fraction: Option<f64>,

    /// In-app update priority, 0 (lowest) through 5
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_app_update_priority: Option<i64>,

    /// Per-locale release notes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub release_notes: Vec<LocalizedNote>,
}

/// A track and its release list; the body of a track update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track name (e.g. "internal", "production")
    pub track: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub releases: Vec<TrackRelease>,
}

/// What a successful publish produced
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// Standard track: the edit was committed
    Committed {
        edit_id: String,
        commit_id: String,
        /// Non-zero version codes, in upload order
        version_codes: Vec<i64>,
        /// Non-fatal problems (e.g. a failed deobfuscation side-upload)
        warnings: Vec<String>,
    },
    /// Internal app sharing: per-artifact download URLs, in upload order
    Shared { download_urls: Vec<String> },
}
