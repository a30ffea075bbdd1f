//! # Service Configuration
//!
//! Loaded from YAML. Every field has a default, so an empty document (or
//! no file at all) yields the standard two-approval, one-rejection policy
//! with importer notifications on.
//!
//! ```yaml
//! review_policy:
//!   approvals_required: 2
//!   rejections_required: 1
//!   require_distinct_voters: false
//! notify_importer: true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use softpkg_state::ReviewPolicy;

use crate::error::ServiceError;

/// Environment variable the CLI reads a config file path from.
pub const CONFIG_ENV_VAR: &str = "SOFTPKG_CONFIG";

/// Review service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Vote thresholds and voter rules.
    pub review_policy: ReviewPolicy,
    /// Send the importer a notification when the review is decided.
    pub notify_importer: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            review_policy: ReviewPolicy::default(),
            notify_importer: true,
        }
    }
}

impl ServiceConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ServiceError> {
        // serde_yaml reads an empty document as null, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ServiceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a YAML file.
    pub fn load(path: &Path) -> Result<Self, ServiceError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Config(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&raw)
    }

    /// Reject configurations under which a review can never finalize.
    pub fn validate(&self) -> Result<(), ServiceError> {
        self.review_policy.validate().map_err(ServiceError::Config)
    }
}
