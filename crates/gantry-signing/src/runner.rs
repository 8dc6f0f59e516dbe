//! Subprocess invocation
//!
//! Every external tool call goes through the [`CommandRunner`] capability so
//! the signing sequences can be tested deterministically without real
//! toolchain binaries.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::Result;

/// Captured result of one tool invocation
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Process exit code; -1 when the process was killed by a signal
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Runs a program with arguments and captures its output
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &Path, args: &[String]) -> Result<CommandOutput>;
}

/// Production runner over tokio subprocesses
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait::async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<CommandOutput> {
        debug!("Running {} with args: {:?}", program.display(), args);

        let output = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        Ok(CommandOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
