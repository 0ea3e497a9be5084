//! content-export CLI
//!
//! Exports content objects to files using the rules of an export manifest.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: could not set up logging: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!(config = %cli.config.display(), "Starting");

    match cli.command {
        Commands::Run {
            objects,
            dry_run,
            json,
        } => commands::run_export(&cli.config, &objects, dry_run, json),
        Commands::Check => commands::run_check(&cli.config),
        Commands::Status { json } => commands::run_status(&cli.config, json),
    }
}
