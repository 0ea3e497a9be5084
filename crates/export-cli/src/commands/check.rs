//! Check command implementation

use std::path::Path;

use colored::Colorize;
use export_core::{CheckStatus, DriftItem};

use super::Project;
use crate::error::{CliError, Result};

fn print_items(marker: colored::ColoredString, items: &[DriftItem]) {
    for item in items {
        println!(
            "   {} {} ({}): {}",
            marker,
            item.path.cyan(),
            item.format.dimmed(),
            item.description
        );
    }
}

/// Run the check command
///
/// Validates that the output directory matches the ledger.
pub fn run_check(config: &Path) -> Result<()> {
    println!("{} Checking exported files...", "=>".blue().bold());

    let project = Project::load(config)?;
    let report = project.engine.check();

    match report.status {
        CheckStatus::Healthy => {
            println!("{} Output is healthy. No drift detected.", "OK".green().bold());
        }
        CheckStatus::Missing => {
            println!("{} Some files are missing:", "MISSING".yellow().bold());
            print_items("-".yellow(), &report.missing);
        }
        CheckStatus::Drifted => {
            println!("{} Exported files were edited:", "DRIFTED".red().bold());
            print_items("!".red(), &report.drifted);
            if !report.missing.is_empty() {
                println!();
                println!("{} Also missing:", "MISSING".yellow().bold());
                print_items("-".yellow(), &report.missing);
            }
        }
        CheckStatus::Broken => {
            println!("{} The ledger cannot be used:", "BROKEN".red().bold());
            for message in &report.messages {
                println!("   {} {}", "!".red(), message);
            }
            return Err(CliError::user("ledger is unreadable"));
        }
    }

    for message in &report.messages {
        println!("   {} {}", "i".dimmed(), message);
    }
    if !report.is_healthy() {
        println!();
        println!("Run {} to rewrite them.", "content-export run".cyan());
    }

    Ok(())
}
