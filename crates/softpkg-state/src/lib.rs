//! # softpkg-state: Package Import Request Lifecycle
//!
//! The only part of the review system with real state-transition logic.
//! A [`PackageRequest`] decides who may change its phase, in which phase,
//! and under what preconditions, and records the terminal decision
//! (approved or rejected) exactly once.
//!
//! ## Lifecycle
//!
//! ```text
//! Reviewing ──2nd approval──▶ CreatingRepo ──repo created──▶ Closed
//!     │
//!     ├──1st rejection──▶ Closed   (review result: Rejected)
//!     └──abandon──────▶ Closed     (review result: Unset)
//! ```
//!
//! ## Design
//!
//! The aggregate is a plain in-memory value. Nothing here locks, blocks,
//! or performs I/O: callers serialize mutations per request (load, mutate,
//! store under one lock or transaction) and perform side effects only when
//! a mutation returns a finalization signal of `true`.

pub mod application;
pub mod comment;
pub mod phase;
pub mod policy;
pub mod request;

pub use application::{Application, SourceCode};
pub use comment::ReviewComment;
pub use phase::{PackagePhase, ReviewResult};
pub use policy::{ReviewPolicy, APPROVALS_REQUIRED, REJECTIONS_REQUIRED};
pub use request::{
    PackageRequest, RequestError, REASON_CANT_DO_THIS, REASON_COMMENTS_CLOSED, REASON_NOT_IMPORTER,
    REASON_NOT_READY,
};
