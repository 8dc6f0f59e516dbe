//! Localized release notes
//!
//! Release notes come either directly from the caller or from a directory of
//! per-locale text files (`en-US.txt`, `de-DE.txt`, ...) where the file stem
//! is the BCP-47 language tag and the contents are the notes for that locale.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Play rejects release notes longer than 500 characters per locale.
pub const MAX_NOTE_CHARS: usize = 500;

/// One locale's release notes, in the service's `{language, text}` shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedNote {
    /// BCP-47 language tag (e.g. "en-US")
    pub language: String,

    /// Notes text for that locale
    pub text: String,
}

impl LocalizedNote {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            text: text.into(),
        }
    }
}

/// Load per-locale release notes from a directory scan.
///
/// Empty files are skipped, unreadable entries are skipped with a warning,
/// and an overlong note is warned about but still passed through so the
/// service can reject it authoritatively. Results are sorted by language.
pub async fn load_localized_notes(dir: &Path) -> Result<Vec<LocalizedNote>> {
    let mut notes = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let path = entry.path();
        let Some(language) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text.trim_end().to_string(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable release notes file");
                continue;
            }
        };
        if text.is_empty() {
            debug!(language, "skipping empty release notes file");
            continue;
        }
        let chars = text.chars().count();
        if chars > MAX_NOTE_CHARS {
            warn!(
                language,
                chars, "release notes exceed {} characters and may be rejected", MAX_NOTE_CHARS
            );
        }
        notes.push(LocalizedNote::new(language, text));
    }
    notes.sort_by(|a, b| a.language.cmp(&b.language));
    debug!(dir = %dir.display(), locales = notes.len(), "loaded localized release notes");
    Ok(notes)
}
