//! # Identities
//!
//! Request and comment identifiers, plus the account identity of a caller.
//!
//! The calling user is authenticated elsewhere; by the time a value reaches
//! this crate it is an [`Account`] that the aggregate only ever compares
//! for equality via [`is_same_account`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

const ACCOUNT_MAX_LEN: usize = 64;
const EMAIL_MAX_LEN: usize = 254;

// ---------------------------------------------------------------------------
// UUID-based identifiers (always valid by construction)
// ---------------------------------------------------------------------------

/// Unique identifier of a package import request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a new random request identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Unique identifier of a review comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(Uuid);

impl CommentId {
    /// Generate a new random comment identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CommentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// String-based identities (validated at construction)
// ---------------------------------------------------------------------------

/// A platform account name.
///
/// # Validation
///
/// - 1-64 characters
/// - ASCII letters, digits, `.`, `_`, `-`
/// - Must start with a letter or digit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Account(String);

impl_validating_deserialize!(Account);

impl Account {
    /// Create an account from a string, validating format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAccount`] if the name is empty,
    /// too long, or contains disallowed characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let starts_ok = s.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());
        let chars_ok = s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !starts_ok || !chars_ok || s.len() > ACCOUNT_MAX_LEN {
            return Err(ValidationError::InvalidAccount(s));
        }
        Ok(Self(s))
    }

    /// Access the account name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether two accounts denote the same user.
pub fn is_same_account(a: &Account, b: &Account) -> bool {
    a.0 == b.0
}

/// An email address.
///
/// Validation is structural only: exactly one `@`, a non-empty local part,
/// and a domain containing a `.` that neither starts nor ends the domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Email(String);

impl_validating_deserialize!(Email);

impl Email {
    /// Create an email address, validating its shape.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEmail`] on malformed input.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.len() < 3 || s.len() > EMAIL_MAX_LEN || s.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidEmail(s));
        }
        let mut parts = s.split('@');
        let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
            (Some(l), Some(d), None) => (l, d),
            _ => return Err(ValidationError::InvalidEmail(s)),
        };
        if local.is_empty()
            || !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
        {
            return Err(ValidationError::InvalidEmail(s));
        }
        Ok(Self(s))
    }

    /// Access the email address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved caller: platform user id, contact email, and account name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity-provider user id.
    pub id: String,
    /// Contact address used for notifications.
    pub email: Email,
    /// Account name the user acts as.
    pub account: Account,
}
