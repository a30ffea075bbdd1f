//! # Phase and Review Result
//!
//! [`PackagePhase`] is the coarse lifecycle position of a request and
//! drives every transition guard. [`ReviewResult`] is the final disposition
//! of the review and is written at most once.
//!
//! Both serialize as lowercase snake_case strings (`reviewing`,
//! `creating_repo`, `closed`; `approved`, `rejected`). An unset result
//! serializes as the empty string, which is how a stored request without a
//! decision reads back.

use serde::{Deserialize, Serialize};

use softpkg_core::ValidationError;

// ─── Package Phase ───────────────────────────────────────────────────

/// The lifecycle phase of a package request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackagePhase {
    /// Open for votes and comments.
    Reviewing,
    /// Approved; waiting for the repository to be created.
    CreatingRepo,
    /// Finished: rejected, abandoned, or repository created (terminal).
    Closed,
}

impl PackagePhase {
    /// Whether the request is still under review.
    pub fn is_reviewing(&self) -> bool {
        matches!(self, Self::Reviewing)
    }

    /// Whether the request is waiting on repository creation.
    pub fn is_creating_repo(&self) -> bool {
        matches!(self, Self::CreatingRepo)
    }

    /// Whether the request is closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Whether the lifecycle permits moving from `self` to `to`.
    ///
    /// Phases only move forward; nothing ever re-enters `Reviewing`.
    pub fn can_transition_to(&self, to: PackagePhase) -> bool {
        matches!(
            (self, to),
            (Self::Reviewing, Self::CreatingRepo)
                | (Self::Reviewing, Self::Closed)
                | (Self::CreatingRepo, Self::Closed)
        )
    }

    /// Wire name of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reviewing => "reviewing",
            Self::CreatingRepo => "creating_repo",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for PackagePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PackagePhase {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reviewing" => Ok(Self::Reviewing),
            "creating_repo" => Ok(Self::CreatingRepo),
            "closed" => Ok(Self::Closed),
            other => Err(ValidationError::InvalidPhase(other.to_string())),
        }
    }
}

// ─── Review Result ───────────────────────────────────────────────────

/// Final disposition of a review, distinct from the phase.
///
/// Abandoned requests close with the result still `Unset`: withdrawal is
/// not a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewResult {
    /// No decision recorded.
    #[default]
    #[serde(rename = "")]
    Unset,
    /// Reached the approval threshold.
    Approved,
    /// Reached the rejection threshold.
    Rejected,
}

impl ReviewResult {
    /// Whether a decision has been recorded.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// Wire name of the result; empty for `Unset`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ReviewResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => f.write_str("unset"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl std::str::FromStr for ReviewResult {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "unset" => Ok(Self::Unset),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(ValidationError::InvalidReviewResult(other.to_string())),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
