//! Gantry core - shared model for Android release publishing and signing
//!
//! This crate carries the pieces both halves of Gantry need:
//! - artifact kinds and discovery (APK / AAB, by extension only)
//! - localized release-notes loading from a per-locale directory
//! - the named per-component failure policy

pub mod artifact;
pub mod error;
pub mod locator;
pub mod notes;
pub mod policy;

pub use artifact::{Artifact, ArtifactKind, ARTIFACT_EXTENSIONS};
pub use error::{CoreError, Result};
pub use notes::LocalizedNote;
pub use policy::FailurePolicy;
