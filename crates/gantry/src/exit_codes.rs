//! Exit codes for the CLI
//!
//! CI pipelines branch on these, so each error category keeps a stable code.

use gantry_core::CoreError;
use gantry_play::PublishError;
use gantry_signing::SigningError;

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Local validation rejected the request before any remote call
pub const VALIDATION_ERROR: i32 = 2;

/// The distribution service rejected or failed the request
pub const REMOTE_ERROR: i32 = 3;

/// A signing tool or the Android toolchain failed
pub const SIGNING_ERROR: i32 = 4;

/// The publish exceeded its wall-clock budget
pub const TIMEOUT: i32 = 5;

/// Map an error chain to its exit code.
pub fn for_error(err: &anyhow::Error) -> i32 {
    if let Some(publish) = err.downcast_ref::<PublishError>() {
        return match publish {
            PublishError::Timeout(_) => TIMEOUT,
            PublishError::Core(_) => VALIDATION_ERROR,
            PublishError::Io(_) => ERROR,
            e if e.is_validation() => VALIDATION_ERROR,
            _ => REMOTE_ERROR,
        };
    }

    if let Some(signing) = err.downcast_ref::<SigningError>() {
        return match signing {
            SigningError::Core(_) => VALIDATION_ERROR,
            _ => SIGNING_ERROR,
        };
    }

    if err.downcast_ref::<CoreError>().is_some() {
        return VALIDATION_ERROR;
    }

    ERROR
}
