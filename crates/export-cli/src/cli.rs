//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// content-export - Write content objects to files and keep them in sync
#[derive(Parser, Debug)]
#[command(name = "content-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the export manifest
    #[arg(
        short,
        long,
        global = true,
        env = "CONTENT_EXPORT_CONFIG",
        default_value = "export.toml"
    )]
    pub config: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Export objects and reconcile the output directory
    ///
    /// Examples:
    ///   content-export run --objects objects.json
    ///   content-export run --objects objects.json --dry-run
    Run {
        /// JSON file holding an array of objects, or `{ "objects": [...] }`
        #[arg(short, long)]
        objects: PathBuf,

        /// Report what would change without touching any file
        #[arg(long)]
        dry_run: bool,

        /// Output the run report as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Compare the files on disk with the ledger
    Check,

    /// List the files owned by the exporter
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_run_with_flags() {
        let cli = Cli::parse_from([
            "content-export",
            "run",
            "--objects",
            "objects.json",
            "--dry-run",
            "--config",
            "site/export.toml",
        ]);
        assert_eq!(cli.config, PathBuf::from("site/export.toml"));
        assert_eq!(
            cli.command,
            Commands::Run {
                objects: PathBuf::from("objects.json"),
                dry_run: true,
                json: false,
            }
        );
    }

    #[test]
    fn config_defaults_to_export_toml() {
        let cli = Cli::parse_from(["content-export", "-v", "check"]);
        assert!(cli.verbose);
        assert_eq!(cli.command, Commands::Check);
    }

    #[test]
    fn run_requires_objects() {
        assert!(Cli::try_parse_from(["content-export", "run"]).is_err());
    }
}
