//! # Service Error
//!
//! Wraps rejected transitions and validation failures from the domain
//! crates, and adds the failures that only exist at the service boundary:
//! unknown request ids, conflicting submissions, and bad configuration.

use thiserror::Error;

use softpkg_core::{RequestId, ValidationError};
use softpkg_state::RequestError;

/// Errors returned by [`ReviewService`](crate::ReviewService) operations.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// No request with this id exists.
    #[error("package request not found: {0}")]
    NotFound(RequestId),

    /// The operation conflicts with an existing request.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The aggregate rejected the transition.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// An input value failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ServiceError {
    /// Whether the error is a rejected state transition that may succeed
    /// later once preconditions change.
    pub fn is_retryable_transition(&self) -> bool {
        matches!(self, Self::Request(RequestError::InvalidState { .. }))
    }
}
