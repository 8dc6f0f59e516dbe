//! Per-artifact signing sequences
//!
//! APK: zipalign alignment check, forced align to `<name>-aligned.apk`,
//! apksigner sign to `<name>-signed.apk`, apksigner verify. The verify step
//! gates success; an unverifiable output is a failure even though a signed
//! file exists on disk.
//!
//! AAB: one jarsigner invocation, signing the bundle in place.

use std::path::{Path, PathBuf};

use gantry_core::{Artifact, ArtifactKind};
use tracing::{debug, info};

use crate::error::{Result, SigningError};
use crate::runner::CommandRunner;
use crate::toolchain::Toolchain;

/// Release keystore credentials
#[derive(Debug, Clone)]
pub struct Keystore {
    /// Path to the keystore file
    pub path: PathBuf,

    /// Alias of the release key within the keystore
    pub alias: String,

    /// Keystore password
    pub store_password: String,

    /// Key password; defaults to the store password when absent
    pub key_password: Option<String>,
}

/// Signs one artifact through its format-specific tool sequence
pub struct ArtifactSigner<R> {
    runner: R,
    toolchain: Toolchain,
}

impl<R: CommandRunner> ArtifactSigner<R> {
    pub fn new(runner: R, toolchain: Toolchain) -> Self {
        Self { runner, toolchain }
    }

    /// Sign `path` with `keystore`, returning the signed output path.
    ///
    /// Dispatch is by file extension alone; an unrecognized extension fails
    /// before any tool is invoked.
    pub async fn sign(&self, path: &Path, keystore: &Keystore) -> Result<PathBuf> {
        let artifact = Artifact::from_path(path)?;
        match artifact.kind {
            ArtifactKind::Apk => self.sign_apk(&artifact.path, keystore).await,
            ArtifactKind::Aab => self.sign_aab(&artifact.path, keystore).await,
        }
    }

    async fn sign_apk(&self, path: &Path, keystore: &Keystore) -> Result<PathBuf> {
        let zipalign = self.toolchain.zipalign()?;
        let apksigner = self.toolchain.apksigner()?;

        let source = path.to_string_lossy().into_owned();
        let aligned = derived_path(path, "-aligned");
        let signed = derived_path(path, "-signed");

        // The check is informational; the forced align that follows fixes
        // whatever it reports
        let check = self
            .runner
            .run(&zipalign, &args(["-c", "-p", "4", &source]))
            .await?;
        debug!(
            artifact = %path.display(),
            aligned = check.success(),
            "zipalign check"
        );

        let aligned_str = aligned.to_string_lossy().into_owned();
        let align = self
            .runner
            .run(&zipalign, &args(["-f", "-p", "4", &source, &aligned_str]))
            .await?;
        if !align.success() {
            return Err(SigningError::ToolFailed {
                tool: "zipalign".to_string(),
                reason: align.stderr,
            });
        }

        let signed_str = signed.to_string_lossy().into_owned();
        let key_password = keystore
            .key_password
            .as_deref()
            .unwrap_or(&keystore.store_password);
        let sign = self
            .runner
            .run(
                &apksigner,
                &args([
                    "sign",
                    "--ks",
                    &keystore.path.to_string_lossy(),
                    "--ks-key-alias",
                    &keystore.alias,
                    "--ks-pass",
                    &format!("pass:{}", keystore.store_password),
                    "--key-pass",
                    &format!("pass:{}", key_password),
                    "--out",
                    &signed_str,
                    &aligned_str,
                ]),
            )
            .await?;
        if !sign.success() {
            return Err(SigningError::ToolFailed {
                tool: "apksigner".to_string(),
                reason: sign.stderr,
            });
        }

        let verify = self
            .runner
            .run(&apksigner, &args(["verify", &signed_str]))
            .await?;
        if !verify.success() {
            return Err(SigningError::VerificationFailed {
                path: signed,
                reason: verify.stderr,
            });
        }

        info!(artifact = %path.display(), signed = %signed.display(), "signed APK");
        Ok(signed)
    }

    async fn sign_aab(&self, path: &Path, keystore: &Keystore) -> Result<PathBuf> {
        let jarsigner = self.toolchain.jarsigner()?;

        let mut invocation = vec![
            "-keystore".to_string(),
            keystore.path.to_string_lossy().into_owned(),
            "-storepass".to_string(),
            keystore.store_password.clone(),
        ];
        if let Some(key_password) = &keystore.key_password {
            invocation.push("-keypass".to_string());
            invocation.push(key_password.clone());
        }
        invocation.push(path.to_string_lossy().into_owned());
        invocation.push(keystore.alias.clone());

        let output = self.runner.run(&jarsigner, &invocation).await?;
        if !output.success() {
            return Err(SigningError::ToolFailed {
                tool: "jarsigner".to_string(),
                reason: output.stderr,
            });
        }

        info!(artifact = %path.display(), "signed AAB in place");
        Ok(path.to_path_buf())
    }
}

/// `app.apk` with `-aligned` becomes `app-aligned.apk`, same directory
fn derived_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("artifact");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    path.with_file_name(format!("{stem}{suffix}.{ext}"))
}

fn args<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
