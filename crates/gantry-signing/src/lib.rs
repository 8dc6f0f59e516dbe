//! Android artifact signing for Gantry
//!
//! Signs release artifacts with a pre-existing keystore:
//! - APK: zipalign (check, then forced align) and apksigner (sign, verify),
//!   both resolved from a versioned Android SDK build-tools directory
//! - AAB: jarsigner from the JDK, signing in place
//!
//! Artifacts in a batch are processed independently; one failure is recorded
//! at its slot and the remaining artifacts still get signed.

pub mod batch;
pub mod error;
pub mod pipeline;
pub mod runner;
pub mod toolchain;

pub use batch::{sign_batch, BatchOutcome, SignedSlot, FAILURE_POLICY};
pub use error::{Result, SigningError};
pub use pipeline::{ArtifactSigner, Keystore};
pub use runner::{CommandOutput, CommandRunner, ProcessRunner};
pub use toolchain::Toolchain;
