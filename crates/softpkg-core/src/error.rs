//! # Error Types: Value Validation
//!
//! Every value-type constructor in this crate fails with a
//! [`ValidationError`] naming the offending kind of value and carrying the
//! rejected input, so callers can report exactly what was wrong.

use thiserror::Error;

/// A value failed validation at construction or deserialization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Account names are 1-64 chars of `[A-Za-z0-9._-]`, starting alphanumeric.
    #[error("invalid account: {0:?}")]
    InvalidAccount(String),

    /// Email addresses need a non-empty local part and a dotted domain.
    #[error("invalid email: {0:?}")]
    InvalidEmail(String),

    /// Package names are 1-128 chars of `[A-Za-z0-9._+-]`, starting alphanumeric.
    #[error("invalid package name: {0:?}")]
    InvalidPackageName(String),

    /// URL could not be parsed, or is not an http(s) URL with a host.
    #[error("invalid url {value:?}: {reason}")]
    InvalidUrl {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// License identifier empty, too long, or containing control characters.
    #[error("invalid license: {0:?}")]
    InvalidLicense(String),

    /// Package description empty or too long.
    #[error("invalid package description ({len} chars)")]
    InvalidPackageDesc {
        /// Length in characters of the trimmed input.
        len: usize,
    },

    /// Reason to import empty or too long.
    #[error("invalid reason to import ({len} chars)")]
    InvalidReason {
        /// Length in characters of the trimmed input.
        len: usize,
    },

    /// SIG name empty, too long, or containing disallowed characters.
    #[error("invalid importing sig: {0:?}")]
    InvalidSig(String),

    /// Unknown platform name.
    #[error("invalid package platform: {0:?}")]
    InvalidPlatform(String),

    /// Unknown request phase name.
    #[error("invalid package phase: {0:?}")]
    InvalidPhase(String),

    /// Unknown review result name.
    #[error("invalid review result: {0:?}")]
    InvalidReviewResult(String),

    /// Review comment empty, whitespace-only, or too long.
    #[error("invalid review comment ({len} chars)")]
    InvalidComment {
        /// Length in characters of the trimmed input.
        len: usize,
    },

    /// Timestamp could not be parsed or is out of range.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
