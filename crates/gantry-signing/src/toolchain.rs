//! Signing toolchain discovery
//!
//! zipalign and apksigner live in a versioned Android SDK build-tools
//! directory; jarsigner ships with the JDK and is resolved from PATH. The
//! SDK root comes from ANDROID_HOME, ANDROID_SDK_ROOT, or the common
//! per-platform install locations.

use std::path::PathBuf;

use tracing::debug;

use crate::error::{Result, SigningError};

/// Locates the signing executables for one run
#[derive(Debug, Clone, Default)]
pub struct Toolchain {
    sdk_root: Option<PathBuf>,
    build_tools_version: Option<String>,
    jarsigner_override: Option<PathBuf>,
}

impl Toolchain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this SDK root instead of probing the environment
    pub fn with_sdk_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.sdk_root = Some(root.into());
        self
    }

    /// Pin the build-tools version instead of taking the latest installed
    pub fn with_build_tools_version(mut self, version: impl Into<String>) -> Self {
        self.build_tools_version = Some(version.into());
        self
    }

    /// Use this jarsigner instead of resolving it from PATH
    pub fn with_jarsigner(mut self, path: impl Into<PathBuf>) -> Self {
        self.jarsigner_override = Some(path.into());
        self
    }

    /// Path to zipalign in the resolved build-tools directory
    pub fn zipalign(&self) -> Result<PathBuf> {
        self.build_tool("zipalign")
    }

    /// Path to apksigner in the resolved build-tools directory
    pub fn apksigner(&self) -> Result<PathBuf> {
        self.build_tool("apksigner")
    }

    /// Path to jarsigner, from the override or PATH
    pub fn jarsigner(&self) -> Result<PathBuf> {
        if let Some(path) = &self.jarsigner_override {
            return Ok(path.clone());
        }
        which::which("jarsigner").map_err(|_| SigningError::ToolNotFound {
            tool: "jarsigner".to_string(),
            hint: "Install a JDK and ensure jarsigner is on PATH".to_string(),
        })
    }

    fn sdk_root(&self) -> Result<PathBuf> {
        if let Some(root) = &self.sdk_root {
            return Ok(root.clone());
        }

        let candidates = [
            std::env::var("ANDROID_HOME").ok().map(PathBuf::from),
            std::env::var("ANDROID_SDK_ROOT").ok().map(PathBuf::from),
            Some(PathBuf::from("/usr/local/share/android-sdk")),
            dirs::home_dir().map(|h| h.join("Android/Sdk")),
            dirs::home_dir().map(|h| h.join("Library/Android/sdk")),
        ];

        candidates
            .into_iter()
            .flatten()
            .find(|p| p.exists())
            .ok_or(SigningError::SdkNotFound)
    }

    /// The versioned directory holding zipalign and apksigner
    fn build_tools_dir(&self) -> Result<PathBuf> {
        let build_tools = self.sdk_root()?.join("build-tools");

        if let Some(version) = &self.build_tools_version {
            let dir = build_tools.join(version);
            if !dir.is_dir() {
                return Err(SigningError::ToolchainNotFound { dir });
            }
            return Ok(dir);
        }

        // No pinned version: take the latest installed one
        let entries = std::fs::read_dir(&build_tools).map_err(|_| {
            SigningError::ToolchainNotFound {
                dir: build_tools.clone(),
            }
        })?;
        let mut versions: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .map(|e| e.path())
            .collect();
        versions.sort();

        let dir = versions
            .pop()
            .ok_or(SigningError::ToolchainNotFound { dir: build_tools })?;
        debug!(dir = %dir.display(), "selected latest build-tools version");
        Ok(dir)
    }

    fn build_tool(&self, tool: &str) -> Result<PathBuf> {
        let path = self.build_tools_dir()?.join(tool);
        if path.exists() {
            return Ok(path);
        }
        Err(SigningError::ToolNotFound {
            tool: tool.to_string(),
            hint: "Install Android SDK build-tools or set ANDROID_HOME".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn make_build_tools(sdk: &Path, version: &str, tools: &[&str]) {
        let dir = sdk.join("build-tools").join(version);
        fs::create_dir_all(&dir).unwrap();
        for tool in tools {
            fs::write(dir.join(tool), b"").unwrap();
        }
    }

    #[test]
    fn test_explicit_version_is_honored() {
        let tmp = TempDir::new().unwrap();
        make_build_tools(tmp.path(), "34.0.0", &["zipalign", "apksigner"]);
        make_build_tools(tmp.path(), "35.0.0", &["zipalign", "apksigner"]);

        let toolchain = Toolchain::new()
            .with_sdk_root(tmp.path())
            .with_build_tools_version("34.0.0");

        let zipalign = toolchain.zipalign().unwrap();
        assert!(zipalign.ends_with("build-tools/34.0.0/zipalign"));
    }

    #[test]
    fn test_missing_version_directory() {
        let tmp = TempDir::new().unwrap();
        make_build_tools(tmp.path(), "34.0.0", &["zipalign"]);

        let toolchain = Toolchain::new()
            .with_sdk_root(tmp.path())
            .with_build_tools_version("35.0.0");

        let err = toolchain.zipalign().unwrap_err();
        assert!(matches!(
            err,
            SigningError::ToolchainNotFound { dir } if dir.ends_with("35.0.0")
        ));
    }

    #[test]
    fn test_latest_version_is_selected() {
        let tmp = TempDir::new().unwrap();
        make_build_tools(tmp.path(), "33.0.1", &["apksigner"]);
        make_build_tools(tmp.path(), "34.0.0", &["apksigner"]);

        let toolchain = Toolchain::new().with_sdk_root(tmp.path());
        let apksigner = toolchain.apksigner().unwrap();
        assert!(apksigner.ends_with("build-tools/34.0.0/apksigner"));
    }

    #[test]
    fn test_missing_tool_in_present_directory() {
        let tmp = TempDir::new().unwrap();
        make_build_tools(tmp.path(), "34.0.0", &["apksigner"]);

        let toolchain = Toolchain::new().with_sdk_root(tmp.path());
        let err = toolchain.zipalign().unwrap_err();
        assert!(matches!(
            err,
            SigningError::ToolNotFound { tool, .. } if tool == "zipalign"
        ));
    }

    #[test]
    fn test_missing_build_tools_directory() {
        let tmp = TempDir::new().unwrap();
        let toolchain = Toolchain::new().with_sdk_root(tmp.path());
        assert!(matches!(
            toolchain.zipalign().unwrap_err(),
            SigningError::ToolchainNotFound { .. }
        ));
    }

    #[test]
    fn test_jarsigner_override() {
        let tmp = TempDir::new().unwrap();
        let jarsigner = tmp.path().join("jarsigner");
        fs::write(&jarsigner, b"").unwrap();

        let toolchain = Toolchain::new().with_jarsigner(&jarsigner);
        assert_eq!(toolchain.jarsigner().unwrap(), jarsigner);
    }
}
