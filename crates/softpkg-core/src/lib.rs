//! # softpkg-core: Foundational Types for Package Import Review
//!
//! Defines the validated value types every other crate in the workspace
//! trusts without re-checking: account identities, package names, URLs,
//! licenses, submission text, review-comment text, identifiers, and UTC
//! timestamps.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain values.** `Account`, `PackageName`,
//!    `Url`, `License`, `CommentText`: all newtypes with validated
//!    constructors. No bare strings cross the crate boundary.
//!
//! 2. **Validation on deserialization.** Deserializing a value type routes
//!    through its constructor, so a stored or wire value that violates the
//!    rules is rejected rather than silently accepted.
//!
//! 3. **UTC-only timestamps from an injectable [`Clock`].** The aggregate
//!    never reads wall-clock time directly.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `softpkg-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

/// Implement `Deserialize` for a string newtype by routing the raw string
/// through the type's `new()` constructor, so invalid values are rejected
/// at deserialization time.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub mod error;
pub mod identity;
pub mod temporal;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::ValidationError;
pub use identity::{is_same_account, Account, CommentId, Email, RequestId, User};
pub use temporal::{Clock, FixedClock, SystemClock, Timestamp};
pub use value::{
    CommentText, ImportingPkgSig, License, PackageDesc, PackageName, PackagePlatform,
    ReasonToImportPkg, Url,
};
