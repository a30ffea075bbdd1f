//! # Check-Config Subcommand
//!
//! Loads a service configuration file and reports the effective settings.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use softpkg_service::ServiceConfig;

/// Arguments for the check-config subcommand.
#[derive(Args, Debug)]
pub struct CheckConfigArgs {
    /// Path to the YAML configuration file.
    pub path: PathBuf,
}

/// Load and validate the file, returning the effective configuration.
pub fn check_config(args: &CheckConfigArgs) -> anyhow::Result<ServiceConfig> {
    let config = ServiceConfig::load(&args.path)
        .with_context(|| format!("invalid configuration in {}", args.path.display()))?;
    tracing::info!(
        path = %args.path.display(),
        approvals_required = config.review_policy.approvals_required,
        rejections_required = config.review_policy.rejections_required,
        "configuration ok"
    );
    Ok(config)
}

/// Handler: print the effective configuration as YAML.
pub fn run(args: &CheckConfigArgs) -> anyhow::Result<()> {
    let config = check_config(args)?;
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}
