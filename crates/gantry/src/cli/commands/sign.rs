//! Sign command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use gantry_core::{locator, CoreError};
use gantry_signing::{sign_batch, ArtifactSigner, BatchOutcome, Keystore, ProcessRunner, Toolchain};

use crate::cli::{output, outputs, Cli, OutputFormat};

/// Sign every APK and AAB found in a directory
#[derive(Debug, Args)]
pub struct SignCommand {
    /// Directory scanned for apk and aab artifacts
    #[arg(long, required = true)]
    pub artifact_dir: PathBuf,

    /// Path to the release keystore
    #[arg(long, env = "ANDROID_KEYSTORE")]
    pub keystore: PathBuf,

    /// Keystore password
    #[arg(long, env = "ANDROID_KEYSTORE_PASSWORD", hide_env_values = true)]
    pub keystore_password: String,

    /// Alias of the release key
    #[arg(long, env = "ANDROID_KEY_ALIAS")]
    pub key_alias: String,

    /// Key password (defaults to the keystore password)
    #[arg(long, env = "ANDROID_KEY_PASSWORD", hide_env_values = true)]
    pub key_password: Option<String>,

    /// Build-tools version (latest installed when unset)
    #[arg(long, env = "ANDROID_BUILD_TOOLS_VERSION")]
    pub build_tools_version: Option<String>,

    /// File to append KEY=value outputs to
    #[arg(long, env = "GANTRY_OUTPUTS_FILE")]
    pub outputs_file: Option<PathBuf>,
}

impl SignCommand {
    /// Execute the sign command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(artifact_dir = %self.artifact_dir.display(), "executing sign command");
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run(cli))
    }

    async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let paths = locator::scan_artifacts(&self.artifact_dir)?;
        if paths.is_empty() {
            return Err(
                CoreError::NoArtifactsFound(self.artifact_dir.display().to_string()).into(),
            );
        }

        let mut toolchain = Toolchain::new();
        if let Some(version) = &self.build_tools_version {
            toolchain = toolchain.with_build_tools_version(version);
        }
        let signer = ArtifactSigner::new(ProcessRunner, toolchain);

        let keystore = Keystore {
            path: self.keystore.clone(),
            alias: self.key_alias.clone(),
            store_password: self.keystore_password.clone(),
            key_password: self.key_password.clone(),
        };

        if !cli.quiet {
            println!(
                "{} {} artifact(s) in {}",
                style("Signing").cyan(),
                paths.len(),
                style(self.artifact_dir.display()).bold()
            );
            if cli.verbose {
                for line in artifact_list(&paths) {
                    println!("{line}");
                }
            }
        }

        let outcome = sign_batch(&signer, &paths, &keystore).await;

        let outputs = outputs::sign_outputs(&outcome);
        if let Some(path) = &self.outputs_file {
            outputs.append_to(path)?;
        }

        match cli.format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json_payload(&outcome, &outputs))?
                );
            }
            OutputFormat::Text => {
                for slot in &outcome.slots {
                    match &slot.outcome {
                        Ok(signed) if !cli.quiet => output::success(&format!(
                            "{} -> {}",
                            slot.source.display(),
                            signed.display()
                        )),
                        Ok(_) => {}
                        Err(err) => {
                            output::error(&format!("{}: {}", slot.source.display(), err))
                        }
                    }
                }
                if !cli.quiet {
                    for (key, value) in outputs.entries() {
                        println!("{key}={value}");
                    }
                }
            }
        }

        // Failures only surface after every slot was processed and the
        // successful outputs were emitted
        let failed = outcome.failed();
        if failed > 0 {
            let total = outcome.slots.len();
            if let Some(err) = outcome.slots.into_iter().find_map(|slot| slot.outcome.err()) {
                return Err(anyhow::Error::new(err)
                    .context(format!("{failed} of {total} artifacts failed to sign")));
            }
        }

        Ok(())
    }
}

/// Per-artifact lines shown with `--verbose` after the directory scan
fn artifact_list(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|path| format!("  {}", style(path.display()).dim()))
        .collect()
}

fn json_payload(outcome: &BatchOutcome, outputs: &outputs::NamedOutputs) -> serde_json::Value {
    let artifacts: Vec<serde_json::Value> = outcome
        .slots
        .iter()
        .map(|slot| match &slot.outcome {
            Ok(signed) => serde_json::json!({
                "source": slot.source.display().to_string(),
                "signed": signed.display().to_string(),
            }),
            Err(err) => serde_json::json!({
                "source": slot.source.display().to_string(),
                "error": err.to_string(),
            }),
        })
        .collect();

    serde_json::json!({
        "result": "signed",
        "total": outcome.slots.len(),
        "failed": outcome.failed(),
        "artifacts": artifacts,
        "outputs": outputs.to_json(),
    })
}
