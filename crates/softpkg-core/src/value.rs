//! # Submission Value Types
//!
//! Validated values that make up a package import application: the package
//! name, its upstream source location and license, descriptive text, the
//! owning SIG, the target platform, and review-comment content.
//!
//! Free-text values are stored trimmed. Length limits count characters, not
//! bytes, so multi-byte descriptions are not penalised.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const PACKAGE_NAME_MAX_LEN: usize = 128;
const LICENSE_MAX_LEN: usize = 64;
const SIG_MAX_LEN: usize = 64;
const DESC_MAX_LEN: usize = 2048;
const REASON_MAX_LEN: usize = 2048;
const COMMENT_MAX_LEN: usize = 4096;

/// Trim and check a free-text value against `1..=max` characters.
fn bounded_text(raw: &str, max: usize) -> Result<String, usize> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len == 0 || len > max {
        return Err(len);
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// PackageName
// ---------------------------------------------------------------------------

/// Name of the package being imported.
///
/// 1-128 characters of ASCII letters, digits, `.`, `_`, `-`, `+`, starting
/// with a letter or digit (`gcc-c++`, `python3.11`, `lib_foo`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PackageName(String);

impl_validating_deserialize!(PackageName);

impl PackageName {
    /// Create a package name, validating its character set.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPackageName`] on malformed input.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let starts_ok = s.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());
        let chars_ok = s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '+'));
        if !starts_ok || !chars_ok || s.len() > PACKAGE_NAME_MAX_LEN {
            return Err(ValidationError::InvalidPackageName(s));
        }
        Ok(Self(s))
    }

    /// Access the package name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Url
// ---------------------------------------------------------------------------

/// An absolute `http` or `https` URL with a host.
///
/// Used for upstream source addresses, pull-request links, and the created
/// repository link. Stored in the normalized form produced by the `url`
/// crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Url(String);

impl_validating_deserialize!(Url);

impl Url {
    /// Parse and validate a URL.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidUrl`] if the input does not parse,
    /// uses a scheme other than http(s), or has no host.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let parsed = match url::Url::parse(s.trim()) {
            Ok(u) => u,
            Err(e) => {
                return Err(ValidationError::InvalidUrl {
                    value: s,
                    reason: e.to_string(),
                })
            }
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidUrl {
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
                value: s,
            });
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(ValidationError::InvalidUrl {
                value: s,
                reason: "missing host".to_string(),
            });
        }
        Ok(Self(parsed.to_string()))
    }

    /// Access the normalized URL string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Url {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// License
// ---------------------------------------------------------------------------

/// License identifier of the upstream source (`MIT`, `Apache-2.0`, `GPL-2.0-or-later`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct License(String);

impl_validating_deserialize!(License);

impl License {
    /// Create a license identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidLicense`] if the trimmed value is
    /// empty, longer than 64 characters, or contains control characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        match bounded_text(&s, LICENSE_MAX_LEN) {
            Ok(t) if !t.chars().any(char::is_control) => Ok(Self(t)),
            _ => Err(ValidationError::InvalidLicense(s)),
        }
    }

    /// Access the license identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for License {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Free-text values
// ---------------------------------------------------------------------------

/// Short description of what the package does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDesc(String);

impl_validating_deserialize!(PackageDesc);

impl PackageDesc {
    /// Create a description of 1-2048 characters after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        bounded_text(&value.into(), DESC_MAX_LEN)
            .map(Self)
            .map_err(|len| ValidationError::InvalidPackageDesc { len })
    }

    /// Access the description text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Justification given by the importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonToImportPkg(String);

impl_validating_deserialize!(ReasonToImportPkg);

impl ReasonToImportPkg {
    /// Create a justification of 1-2048 characters after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        bounded_text(&value.into(), REASON_MAX_LEN)
            .map(Self)
            .map_err(|len| ValidationError::InvalidReason { len })
    }

    /// Access the justification text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Content of a review comment: non-empty, not whitespace-only, at most
/// 4096 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentText(String);

impl_validating_deserialize!(CommentText);

impl CommentText {
    /// Create review-comment content.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidComment`] for empty, blank, or
    /// oversized content.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        bounded_text(&value.into(), COMMENT_MAX_LEN)
            .map(Self)
            .map_err(|len| ValidationError::InvalidComment { len })
    }

    /// Access the comment text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommentText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// ImportingPkgSig
// ---------------------------------------------------------------------------

/// Special interest group that will own the imported package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImportingPkgSig(String);

impl_validating_deserialize!(ImportingPkgSig);

impl ImportingPkgSig {
    /// Create a SIG name: 1-64 characters of ASCII letters, digits, `-`, `_`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let chars_ok = s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
        if s.is_empty() || s.len() > SIG_MAX_LEN || !chars_ok {
            return Err(ValidationError::InvalidSig(s));
        }
        Ok(Self(s))
    }

    /// Access the SIG name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImportingPkgSig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// PackagePlatform
// ---------------------------------------------------------------------------

/// Code-hosting platform where the package repository will be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackagePlatform {
    /// gitee.com
    Gitee,
    /// github.com
    Github,
}

impl PackagePlatform {
    /// Lowercase platform name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gitee => "gitee",
            Self::Github => "github",
        }
    }
}

impl std::fmt::Display for PackagePlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PackagePlatform {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gitee" => Ok(Self::Gitee),
            "github" => Ok(Self::Github),
            _ => Err(ValidationError::InvalidPlatform(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- PackageName --

    #[test]
    fn package_name_accepts_distro_style_names() {
        for name in ["gcc-c++", "python3.11", "lib_foo", "R", "0ad"] {
            assert!(PackageName::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn package_name_rejects_bad_names() {
        for name in ["", "-x", "+x", "a b", "a/b", "名字"] {
            assert!(PackageName::new(name).is_err(), "{name:?} should be rejected");
        }
        assert!(PackageName::new("a".repeat(129)).is_err());
    }

    // -- Url --

    #[test]
    fn url_accepts_http_and_https() {
        let u = Url::new("https://gitee.com/src-openeuler/foo/pulls/1").unwrap();
        assert_eq!(u.as_str(), "https://gitee.com/src-openeuler/foo/pulls/1");
        assert!(Url::new("http://example.org").is_ok());
    }

    #[test]
    fn url_rejects_other_schemes_and_garbage() {
        assert!(Url::new("ftp://example.org/x").is_err());
        assert!(Url::new("mailto:dev@example.org").is_err());
        assert!(Url::new("not a url").is_err());
        assert!(Url::new("").is_err());
    }

    #[test]
    fn url_is_normalized() {
        let u = Url::new("  HTTPS://Example.ORG  ").unwrap();
        assert_eq!(u.as_str(), "https://example.org/");
    }

    // -- License --

    #[test]
    fn license_trims_and_bounds() {
        assert_eq!(License::new("  MIT ").unwrap().as_str(), "MIT");
        assert!(License::new("   ").is_err());
        assert!(License::new("x".repeat(65)).is_err());
        assert!(License::new("MIT\nApache").is_err());
    }

    // -- Free text --

    #[test]
    fn comment_rejects_blank() {
        assert!(CommentText::new("").is_err());
        assert!(CommentText::new(" \n\t ").is_err());
        assert_eq!(CommentText::new(" lgtm ").unwrap().as_str(), "lgtm");
    }

    #[test]
    fn comment_length_counts_chars() {
        assert!(CommentText::new("é".repeat(4096)).is_ok());
        assert!(CommentText::new("é".repeat(4097)).is_err());
    }

    #[test]
    fn desc_and_reason_bounds() {
        assert!(PackageDesc::new("a compression library").is_ok());
        assert!(PackageDesc::new("").is_err());
        assert!(ReasonToImportPkg::new("x".repeat(2049)).is_err());
    }

    #[test]
    fn free_text_deserialize_validates() {
        assert!(serde_json::from_str::<CommentText>("\"  \"").is_err());
        let c: CommentText = serde_json::from_str("\"ok\"").unwrap();
        assert_eq!(c.as_str(), "ok");
    }

    // -- Sig --

    #[test]
    fn sig_validation() {
        assert!(ImportingPkgSig::new("sig-compiler").is_ok());
        assert!(ImportingPkgSig::new("Base_Service").is_ok());
        assert!(ImportingPkgSig::new("").is_err());
        assert!(ImportingPkgSig::new("sig compiler").is_err());
    }

    // -- Platform --

    #[test]
    fn platform_parse_and_display() {
        assert_eq!("Gitee".parse::<PackagePlatform>().unwrap(), PackagePlatform::Gitee);
        assert_eq!(" github ".parse::<PackagePlatform>().unwrap(), PackagePlatform::Github);
        assert!("gitlab".parse::<PackagePlatform>().is_err());
        assert_eq!(PackagePlatform::Github.to_string(), "github");
    }

    #[test]
    fn platform_serde_lowercase() {
        let json = serde_json::to_string(&PackagePlatform::Gitee).unwrap();
        assert_eq!(json, "\"gitee\"");
    }
}
