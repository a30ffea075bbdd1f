//! # softpkg CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Software-package import review toolkit.
///
/// Replays review scenarios against the review service and validates
/// service configuration.
#[derive(Parser, Debug)]
#[command(name = "softpkg", version, about)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Replay a review scenario and print the resulting request.
    Replay(softpkg_cli::replay::ReplayArgs),
    /// Validate a service configuration file.
    CheckConfig(softpkg_cli::config_check::CheckConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Replay(args) => softpkg_cli::replay::run(&args),
        Commands::CheckConfig(args) => softpkg_cli::config_check::run(&args),
    }
}
