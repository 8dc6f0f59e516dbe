//! Upload command

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use console::style;
use tempfile::NamedTempFile;
use tracing::info;

use gantry_core::LocalizedNote;
use gantry_play::{
    AndroidPublisher, PlayConfig, PublishConfig, PublishError, PublishOutcome, Publisher,
};

use crate::cli::{output, outputs, Cli, OutputFormat};

/// Publish artifacts to Google Play through one transactional edit
#[derive(Debug, Args)]
pub struct UploadCommand {
    /// Artifact paths or glob patterns (apk or aab)
    #[arg(required = true)]
    pub artifacts: Vec<String>,

    /// Package name
    #[arg(long, required = true)]
    pub package_name: String,

    /// Path to service account JSON key file
    #[arg(
        long,
        env = "PLAY_SERVICE_ACCOUNT_FILE",
        conflicts_with = "service_account_json"
    )]
    pub service_account_file: Option<PathBuf>,

    /// Service account JSON key contents
    #[arg(long, env = "PLAY_SERVICE_ACCOUNT_JSON", hide_env_values = true)]
    pub service_account_json: Option<String>,

    /// Release track (internal, alpha, beta, production, internal-app-sharing)
    #[arg(long, default_value = "internal")]
    pub track: String,

    /// Release status (completed, draft, halted, inProgress)
    #[arg(long, default_value = "completed")]
    pub status: String,

    /// Staged rollout user fraction, exclusive between 0 and 1
    #[arg(long)]
    pub rollout: Option<f64>,

    /// In-app update priority (0-5)
    #[arg(long)]
    pub update_priority: Option<i64>,

    /// Release name shown in the console
    #[arg(long)]
    pub release_name: Option<String>,

    /// Release notes (format: "en-US:notes,de-DE:notes")
    #[arg(long)]
    pub release_notes: Option<String>,

    /// Directory of per-locale release-notes files (e.g. en-US.txt)
    #[arg(long)]
    pub release_notes_dir: Option<PathBuf>,

    /// ProGuard/R8 mapping file attached to each APK upload
    #[arg(long)]
    pub mapping_file: Option<PathBuf>,

    /// Native debug symbols zip or directory attached to each APK upload
    #[arg(long)]
    pub debug_symbols: Option<PathBuf>,

    /// Resume an existing uncommitted edit instead of opening a new one
    #[arg(long)]
    pub existing_edit_id: Option<String>,

    /// Ask the service not to send the committed changes for review
    #[arg(long)]
    pub changes_not_sent_for_review: bool,

    /// Timeout in seconds for the whole publish
    #[arg(long, default_value = "3600")]
    pub timeout: u64,

    /// File to append KEY=value outputs to
    #[arg(long, env = "GANTRY_OUTPUTS_FILE")]
    pub outputs_file: Option<PathBuf>,
}

impl UploadCommand {
    /// Execute the upload command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            package_name = %self.package_name,
            track = %self.track,
            "executing upload command"
        );
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run(cli))
    }

    async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        // The guard keeps an inline key on disk until the publish finishes
        let (key_path, _key_guard) =
            resolve_service_account(self.service_account_file.as_deref(), self.service_account_json.as_deref())?;

        let service = AndroidPublisher::new(PlayConfig {
            package_name: self.package_name.clone(),
            service_account_key: key_path,
        })?;

        let mut config = PublishConfig::new(&self.package_name);
        config.track = self.track.clone();
        config.status = self.status.clone();
        config.user_fraction = self.rollout;
        config.update_priority = self.update_priority;
        config.release_name = self.release_name.clone();
        config.release_notes = self
            .release_notes
            .as_deref()
            .map(parse_release_notes)
            .unwrap_or_default();
        config.release_notes_dir = self.release_notes_dir.clone();
        config.mapping_file = self.mapping_file.clone();
        config.debug_symbols = self.debug_symbols.clone();
        config.existing_edit_id = self.existing_edit_id.clone();
        config.changes_not_sent_for_review = self.changes_not_sent_for_review;
        config.timeout = Duration::from_secs(self.timeout);

        if !cli.quiet {
            println!(
                "{} {} to Google Play ({})",
                style("Publishing").cyan(),
                style(self.artifacts.join(" ")).bold(),
                self.track
            );
            if cli.verbose {
                for line in verbose_detail(&config) {
                    println!("{line}");
                }
            }
        }

        let publisher = Publisher::new(service);
        let outcome = publisher.publish(&config, &self.artifacts).await?;

        let outputs = outputs::upload_outputs(&outcome);
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
                if !cli.quiet {
                    report(&outcome);
                    for (key, value) in outputs.entries() {
                        println!("{key}={value}");
                    }
                }
            }
        }

        Ok(())
    }
}

/// Per-step release detail shown before publishing with `--verbose`
fn verbose_detail(config: &PublishConfig) -> Vec<String> {
    let mut lines = vec![
        output::key_value("Status", &config.status),
        output::key_value("Timeout", &format!("{}s", config.timeout.as_secs())),
    ];
    if let Some(fraction) = config.user_fraction {
        lines.push(output::key_value("Rollout", &fraction.to_string()));
    }
    if let Some(priority) = config.update_priority {
        lines.push(output::key_value("Update priority", &priority.to_string()));
    }
    if let Some(edit_id) = &config.existing_edit_id {
        lines.push(output::key_value("Resuming edit", edit_id));
    }
    if let Some(mapping) = &config.mapping_file {
        lines.push(output::key_value("Mapping file", &mapping.display().to_string()));
    }
    if let Some(symbols) = &config.debug_symbols {
        lines.push(output::key_value("Debug symbols", &symbols.display().to_string()));
    }
    lines
}

fn report(outcome: &PublishOutcome) {
    match outcome {
        PublishOutcome::Committed {
            edit_id,
            commit_id,
            version_codes,
            warnings,
        } => {
            output::success("Release committed");
            println!("{}", output::key_value("Edit", edit_id));
            println!("{}", output::key_value("Commit", commit_id));
            let codes = version_codes
                .iter()
                .map(|code| code.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!("{}", output::key_value("Version codes", &codes));
            for warning in warnings {
                output::warning(warning);
            }
        }
        PublishOutcome::Shared { download_urls } => {
            output::success("Artifacts shared via internal app sharing");
            for url in download_urls {
                println!("{}", output::key_value("Download", url));
            }
        }
    }
}

fn json_payload(outcome: &PublishOutcome, outputs: &outputs::NamedOutputs) -> serde_json::Value {
    match outcome {
        PublishOutcome::Committed {
            edit_id,
            commit_id,
            version_codes,
            warnings,
        } => serde_json::json!({
            "result": "committed",
            "editId": edit_id,
            "commitId": commit_id,
            "versionCodes": version_codes,
            "warnings": warnings,
            "outputs": outputs.to_json(),
        }),
        PublishOutcome::Shared { download_urls } => serde_json::json!({
            "result": "shared",
            "downloadUrls": download_urls,
            "outputs": outputs.to_json(),
        }),
    }
}

/// Parse release notes in the "lang:text,lang:text" flag format
fn parse_release_notes(notes: &str) -> Vec<LocalizedNote> {
    notes
        .split(',')
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, ':');
            match (parts.next(), parts.next()) {
                (Some(lang), Some(text)) => Some(LocalizedNote::new(lang, text)),
                _ => None,
            }
        })
        .collect()
}

/// A key file is used as given; inline key JSON is staged to a temp file
/// that lives as long as the returned guard.
fn resolve_service_account(
    file: Option<&Path>,
    inline: Option<&str>,
) -> anyhow::Result<(PathBuf, Option<NamedTempFile>)> {
    if let Some(path) = file {
        return Ok((path.to_path_buf(), None));
    }
    if let Some(json) = inline {
        let mut staged = NamedTempFile::new()?;
        staged.write_all(json.as_bytes())?;
        return Ok((staged.path().to_path_buf(), Some(staged)));
    }
    Err(PublishError::ConfigurationError(
        "Provide --service-account-file or --service-account-json".to_string(),
    )
    .into())
}
