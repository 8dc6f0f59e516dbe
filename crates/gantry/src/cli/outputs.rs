//! Named outputs for downstream CI steps
//!
//! Each command finishes by emitting `KEY=value` pairs: appended to the
//! configured outputs file, echoed in text mode, and embedded in JSON
//! payloads. Downstream steps read the file instead of scraping logs.

use std::io::Write;
use std::path::Path;

use gantry_play::PublishOutcome;
use gantry_signing::BatchOutcome;

/// Ordered `KEY=value` pairs produced by one command run
#[derive(Debug, Default)]
pub struct NamedOutputs {
    entries: Vec<(String, String)>,
}

impl NamedOutputs {
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Append `KEY=value` lines to `path`, creating the file if needed.
    ///
    /// Appending lets several pipeline steps share one outputs file.
    pub fn append_to(&self, path: &Path) -> std::io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        for (key, value) in &self.entries {
            writeln!(file, "{key}={value}")?;
        }
        Ok(())
    }

    /// Outputs as a JSON object, for `--format json` payloads
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|(key, value)| (key.clone(), serde_json::Value::String(value.clone())))
            .collect();
        serde_json::Value::Object(map)
    }
}

/// Outputs for a publish run
pub fn upload_outputs(outcome: &PublishOutcome) -> NamedOutputs {
    let mut outputs = NamedOutputs::default();
    match outcome {
        PublishOutcome::Committed {
            edit_id,
            commit_id,
            version_codes,
            ..
        } => {
            outputs.push("EDIT_ID", edit_id);
            outputs.push("COMMIT_ID", commit_id);
            outputs.push(
                "VERSION_CODES",
                version_codes
                    .iter()
                    .map(|code| code.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            );
        }
        PublishOutcome::Shared { download_urls } => {
            for (index, url) in download_urls.iter().enumerate() {
                outputs.push(format!("DOWNLOAD_URL_{index}"), url);
            }
            outputs.push("DOWNLOAD_URLS", download_urls.join("|"));
        }
    }
    outputs
}

/// Outputs for a signing batch.
///
/// Indexed keys follow the submission index, so a failed slot leaves a gap
/// rather than renumbering the slots after it.
pub fn sign_outputs(outcome: &BatchOutcome) -> NamedOutputs {
    let mut outputs = NamedOutputs::default();
    for (index, slot) in outcome.slots.iter().enumerate() {
        if let Ok(path) = &slot.outcome {
            outputs.push(
                format!("SIGNED_ARTIFACT_PATH_{index}"),
                path.display().to_string(),
            );
        }
    }
    let signed = outcome.signed_paths();
    outputs.push(
        "SIGNED_ARTIFACT_PATHS",
        signed
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join("|"),
    );
    outputs.push("SIGNED_ARTIFACT_COUNT", signed.len().to_string());
    if outcome.slots.len() == 1 && signed.len() == 1 {
        outputs.push("SIGNED_ARTIFACT_PATH", signed[0].display().to_string());
    }
    outputs
}
