//! # Review Policy
//!
//! Vote thresholds at which a review is finalized. Kept as named constants
//! and a small policy value so a change in review rules touches one place.

use serde::{Deserialize, Serialize};

/// Approvals needed to finalize a request as approved.
pub const APPROVALS_REQUIRED: usize = 2;

/// Rejections needed to finalize a request as rejected.
pub const REJECTIONS_REQUIRED: usize = 1;

/// Thresholds and voter rules applied by `approve_under` / `reject_under`.
///
/// Finalization happens when a vote list reaches *exactly* its threshold.
/// By default the same account may vote more than once and each vote
/// counts; set `require_distinct_voters` to ignore repeat votes instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewPolicy {
    /// Approvals that finalize the review as approved.
    pub approvals_required: usize,
    /// Rejections that finalize the review as rejected.
    pub rejections_required: usize,
    /// Ignore a vote from an account already in the same vote list.
    pub require_distinct_voters: bool,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            approvals_required: APPROVALS_REQUIRED,
            rejections_required: REJECTIONS_REQUIRED,
            require_distinct_voters: false,
        }
    }
}

impl ReviewPolicy {
    /// Check that both thresholds are reachable.
    pub fn validate(&self) -> Result<(), String> {
        if self.approvals_required == 0 {
            return Err("approvals_required must be at least 1".to_string());
        }
        if self.rejections_required == 0 {
            return Err("rejections_required must be at least 1".to_string());
        }
        Ok(())
    }
}
