//! Release configuration validation
//!
//! All checks here run locally, before the first remote call, so a bad
//! configuration never leaves partial state on the service.

use tracing::debug;

use crate::config::PublishConfig;
use crate::error::{PublishError, Result};
use crate::types::ReleaseStatus;

/// Accepted range for in-app update priority
pub const PRIORITY_RANGE: std::ops::RangeInclusive<i64> = 0..=5;

/// Validate the release configuration and return the parsed status.
///
/// Check order: status shape, status/fraction coupling, then numeric ranges.
pub fn validate_release_config(config: &PublishConfig) -> Result<ReleaseStatus> {
    debug!(status = %config.status, track = %config.track, "validating release configuration");

    let status: ReleaseStatus = config.status.parse()?;

    match (status.requires_fraction(), config.user_fraction) {
        (false, Some(_)) => return Err(PublishError::IncompatibleStatusOption { status }),
        (true, None) => return Err(PublishError::MissingRequiredOption { status }),
        _ => {}
    }

    if let Some(fraction) = config.user_fraction {
        validate_user_fraction(fraction)?;
    }

    if let Some(priority) = config.update_priority {
        validate_update_priority(priority)?;
    }

    Ok(status)
}

/// A rollout fraction must be finite and strictly between 0 and 1
pub fn validate_user_fraction(fraction: f64) -> Result<()> {
    if !fraction.is_finite() || fraction <= 0.0 || fraction >= 1.0 {
        return Err(PublishError::OutOfRange {
            field: "rollout fraction",
            value: fraction.to_string(),
            expected: "a finite value strictly between 0 and 1",
        });
    }
    Ok(())
}

/// Update priority must lie in [0, 5]
pub fn validate_update_priority(priority: i64) -> Result<()> {
    if !PRIORITY_RANGE.contains(&priority) {
        return Err(PublishError::OutOfRange {
            field: "update priority",
            value: priority.to_string(),
            expected: "an integer between 0 and 5",
        });
    }
    Ok(())
}
