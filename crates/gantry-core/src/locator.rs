//! Artifact discovery
//!
//! Two entry points: sign mode scans a directory for files with known
//! artifact extensions, upload mode expands caller-supplied glob patterns.
//! Both return paths in a deterministic order so downstream per-index
//! results stay stable across runs.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::artifact::ARTIFACT_EXTENSIONS;
use crate::error::{CoreError, Result};

/// Scan `dir` for files whose extension matches one of `extensions`,
/// case-insensitively, returned in file-name order.
pub fn scan_directory(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
            found.push(path);
        }
    }
    found.sort();
    debug!(dir = %dir.display(), count = found.len(), "scanned directory for artifacts");
    Ok(found)
}

/// Scan `dir` with the default artifact extensions.
pub fn scan_artifacts(dir: &Path) -> Result<Vec<PathBuf>> {
    scan_directory(dir, ARTIFACT_EXTENSIONS)
}

/// Expand glob patterns into existing file paths.
///
/// Pattern order is preserved; matches within one pattern come back in the
/// sorted order the glob walk produces. Unreadable matches are skipped with
/// a warning, duplicates across overlapping patterns are dropped, and a
/// malformed pattern is an error. A literal path that exists is a valid
/// single-match pattern.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        let entries = glob::glob(pattern).map_err(|source| CoreError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    if !paths.contains(&path) {
                        paths.push(path);
                    }
                }
                Ok(path) => debug!(path = %path.display(), "skipping non-file match"),
                Err(err) => warn!(pattern = %pattern, error = %err, "skipping unreadable match"),
            }
        }
    }
    debug!(count = paths.len(), "expanded artifact patterns");
    Ok(paths)
}
