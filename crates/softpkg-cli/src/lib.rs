//! # softpkg-cli: Package Import Review Command-Line Interface
//!
//! ## Subcommands
//!
//! - `replay`: Run a YAML review scenario through the service and print
//!   the resulting request, step outcomes, and published events
//! - `check-config`: Parse and validate a service configuration file
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to `softpkg-service`; no review rules here.
//! - Logs go to stderr so stdout carries only the JSON report.

pub mod config_check;
pub mod replay;
