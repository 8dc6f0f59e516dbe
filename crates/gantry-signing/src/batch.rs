//! Batch signing over an ordered artifact list
//!
//! Unlike publishing, signing one artifact never invalidates another, so a
//! failed slot is recorded and the batch moves on. Slot order mirrors the
//! input order, including failed slots, so callers can line results up with
//! what they asked for.

use std::path::{Path, PathBuf};

use gantry_core::FailurePolicy;
use tracing::{error, info};

use crate::error::Result;
use crate::pipeline::{ArtifactSigner, Keystore};
use crate::runner::CommandRunner;

/// A failed artifact does not stop the batch; every input gets a slot.
pub const FAILURE_POLICY: FailurePolicy = FailurePolicy::ContinueOnFailure;

/// Result for one input artifact, at the same index it was submitted
#[derive(Debug)]
pub struct SignedSlot {
    /// The artifact as submitted
    pub source: PathBuf,

    /// Signed output path, or why this artifact failed
    pub outcome: Result<PathBuf>,
}

/// Results for a whole batch, in submission order
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub slots: Vec<SignedSlot>,
}

impl BatchOutcome {
    /// Number of artifacts that failed to sign
    pub fn failed(&self) -> usize {
        self.slots.iter().filter(|s| s.outcome.is_err()).count()
    }

    /// Output paths of the artifacts that signed, in submission order
    pub fn signed_paths(&self) -> Vec<&Path> {
        self.slots
            .iter()
            .filter_map(|s| s.outcome.as_ref().ok())
            .map(PathBuf::as_path)
            .collect()
    }
}

/// Sign every artifact in `paths` with the same keystore.
pub async fn sign_batch<R: CommandRunner>(
    signer: &ArtifactSigner<R>,
    paths: &[PathBuf],
    keystore: &Keystore,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for path in paths {
        let result = signer.sign(path, keystore).await;
        if let Err(err) = &result {
            error!(artifact = %path.display(), error = %err, "signing failed");
        }
        let failed = result.is_err();
        outcome.slots.push(SignedSlot {
            source: path.clone(),
            outcome: result,
        });
        if failed && FAILURE_POLICY != FailurePolicy::ContinueOnFailure {
            break;
        }
    }

    info!(
        total = outcome.slots.len(),
        failed = outcome.failed(),
        "batch signing finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SigningError;
    use crate::runner::CommandOutput;
    use crate::toolchain::Toolchain;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Fails any invocation whose last path argument contains "bad"
    #[derive(Default)]
    struct MarkerRunner {
        calls: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait::async_trait]
    impl CommandRunner for MarkerRunner {
        async fn run(&self, _program: &Path, invocation: &[String]) -> Result<CommandOutput> {
            self.calls.lock().unwrap().push(invocation.to_vec());
            let failed = invocation.iter().any(|a| a.contains("bad"));
            Ok(CommandOutput {
                status: if failed { 1 } else { 0 },
                stdout: String::new(),
                stderr: if failed {
                    "marker".to_string()
                } else {
                    String::new()
                },
            })
        }
    }

    fn fixture(tmp: &TempDir) -> (ArtifactSigner<MarkerRunner>, Keystore) {
        let tools = tmp.path().join("sdk/build-tools/34.0.0");
        fs::create_dir_all(&tools).unwrap();
        fs::write(tools.join("zipalign"), b"").unwrap();
        fs::write(tools.join("apksigner"), b"").unwrap();
        let jarsigner = tmp.path().join("jarsigner");
        fs::write(&jarsigner, b"").unwrap();

        let toolchain = Toolchain::new()
            .with_sdk_root(tmp.path().join("sdk"))
            .with_jarsigner(jarsigner);
        let keystore = Keystore {
            path: tmp.path().join("release.jks"),
            alias: "release".to_string(),
            store_password: "storepw".to_string(),
            key_password: None,
        };
        (ArtifactSigner::new(MarkerRunner::default(), toolchain), keystore)
    }

    #[test]
    fn test_batch_policy_is_continue_on_failure() {
        assert_eq!(FAILURE_POLICY, FailurePolicy::ContinueOnFailure);
    }

    #[tokio::test]
    async fn test_batch_continues_past_a_failed_artifact() {
        let tmp = TempDir::new().unwrap();
        let (signer, keystore) = fixture(&tmp);
        let paths = vec![
            tmp.path().join("first.apk"),
            tmp.path().join("bad.apk"),
            tmp.path().join("third.aab"),
        ];

        let outcome = sign_batch(&signer, &paths, &keystore).await;

        assert_eq!(outcome.slots.len(), 3);
        assert_eq!(outcome.failed(), 1);
        assert!(outcome.slots[0].outcome.is_ok());
        assert!(outcome.slots[1].outcome.is_err());
        assert!(outcome.slots[2].outcome.is_ok());
        assert_eq!(
            outcome.signed_paths(),
            vec![
                tmp.path().join("first-signed.apk"),
                tmp.path().join("third.aab"),
            ]
        );
    }

    #[tokio::test]
    async fn test_batch_slots_keep_submission_order() {
        let tmp = TempDir::new().unwrap();
        let (signer, keystore) = fixture(&tmp);
        let paths = vec![
            tmp.path().join("bad.aab"),
            tmp.path().join("ok.apk"),
        ];

        let outcome = sign_batch(&signer, &paths, &keystore).await;

        assert_eq!(outcome.slots[0].source, paths[0]);
        assert_eq!(outcome.slots[1].source, paths[1]);
        assert!(matches!(
            outcome.slots[0].outcome,
            Err(SigningError::ToolFailed { ref tool, .. }) if tool == "jarsigner"
        ));
        assert_eq!(outcome.slots[1].outcome.as_ref().unwrap(), &tmp.path().join("ok-signed.apk"));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let tmp = TempDir::new().unwrap();
        let (signer, keystore) = fixture(&tmp);

        let outcome = sign_batch(&signer, &[], &keystore).await;

        assert!(outcome.slots.is_empty());
        assert_eq!(outcome.failed(), 0);
        assert!(outcome.signed_paths().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_artifact_fills_its_slot() {
        let tmp = TempDir::new().unwrap();
        let (signer, keystore) = fixture(&tmp);
        let paths = vec![
            tmp.path().join("notes.txt"),
            tmp.path().join("app.apk"),
        ];

        let outcome = sign_batch(&signer, &paths, &keystore).await;

        assert!(matches!(
            outcome.slots[0].outcome,
            Err(SigningError::Core(_))
        ));
        assert!(outcome.slots[1].outcome.is_ok());
    }
}
