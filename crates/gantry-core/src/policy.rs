//! Failure policies for multi-artifact operations

use serde::{Deserialize, Serialize};

/// How a multi-artifact operation reacts when one artifact fails.
///
/// Publishing uploads into a single transactional edit, so the first failure
/// aborts the whole run and nothing is committed. Signing treats each
/// artifact independently and keeps going, reporting per-artifact outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failed artifact; prior work is discarded
    AbortOnFirstFailure,

    /// Process every artifact; collect per-artifact successes and failures
    ContinueOnFailure,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AbortOnFirstFailure => write!(f, "abort-on-first-failure"),
            Self::ContinueOnFailure => write!(f, "continue-on-failure"),
        }
    }
}
