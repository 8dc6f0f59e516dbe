//! Artifact kinds and descriptors
//!
//! A release artifact is either an APK or an App Bundle, and the kind is
//! determined solely by the file extension. The two kinds take different
//! signing procedures and different upload calls, so an unrecognized
//! extension is always a hard error rather than a skip.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Extensions recognized as release artifacts
pub const ARTIFACT_EXTENSIONS: &[&str] = &["apk", "aab"];

/// The two supported build-artifact formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Android application package; aligned with zipalign before signing
    Apk,
    /// Android App Bundle; signed in place with jarsigner
    Aab,
}

impl ArtifactKind {
    /// Determine the kind from the file extension alone, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext.eq_ignore_ascii_case("apk") {
            Ok(ArtifactKind::Apk)
        } else if ext.eq_ignore_ascii_case("aab") {
            Ok(ArtifactKind::Aab)
        } else {
            Err(CoreError::UnsupportedArtifact {
                path: path.to_path_buf(),
            })
        }
    }

    /// Canonical lowercase extension for this kind
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Apk => "apk",
            ArtifactKind::Aab => "aab",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A build output file with its resolved kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path to the artifact file
    pub path: PathBuf,

    /// Format derived from the file extension
    pub kind: ArtifactKind,
}

impl Artifact {
    /// Build a descriptor, failing on unrecognized extensions.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let kind = ArtifactKind::from_path(&path)?;
        Ok(Self { path, kind })
    }

    /// File name for display and upload logging
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
