//! Google Play publishing for Gantry
//!
//! This crate drives the transactional half of Gantry: it publishes APK and
//! AAB artifacts to the Play Developer API through a server-side edit, which
//! is populated with uploads and a track update and then committed atomically.
//!
//! ## Transaction model
//!
//! A publish either commits one edit containing every artifact or fails with
//! the edit left open server-side for inspection. There is no compensating
//! rollback; operators resume with the edit id or discard the edit.
//!
//! The special `internal-app-sharing` track bypasses the edit model entirely
//! and uploads each artifact directly, returning per-file download URLs.
//!
//! ## Usage
//!
//! ```ignore
//! use gantry_play::{AndroidPublisher, PlayConfig, PublishConfig, Publisher};
//!
//! let service = AndroidPublisher::new(play_config)?;
//! let publisher = Publisher::new(service);
//! let outcome = publisher.publish(&config, &patterns).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod publish;
pub mod symbols;
pub mod types;
pub mod validation;

pub use client::EditService;
pub use config::PublishConfig;
pub use error::{PublishError, Result};
pub use http::{AndroidPublisher, PlayConfig};
pub use publish::{Publisher, FAILURE_POLICY};
pub use types::{PublishOutcome, ReleaseStatus, Track, TrackRelease};
