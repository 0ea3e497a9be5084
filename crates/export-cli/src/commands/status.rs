//! Status command implementation

use std::path::Path;

use colored::Colorize;

use super::Project;
use crate::error::Result;

/// Run the status command
pub fn run_status(config: &Path, json: bool) -> Result<()> {
    let project = Project::load(config)?;
    let files = project.engine.tracked_files()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    println!("{}", "Export Status".bold());
    println!();
    println!("{}:  {}", "Output".dimmed(), project.engine.root().as_str());
    println!("{}:  {}", "Ledger".dimmed(), project.engine.ledger_path().as_str());
    println!("{}:   {}", "Rules".dimmed(), project.manifest.rules.len());
    println!();

    println!("{}:", "Tracked Files".bold());
    if files.is_empty() {
        println!(
            "  {} (use {} to export)",
            "None".dimmed(),
            "content-export run".cyan()
        );
    }
    for file in &files {
        let state = match file.checksum {
            Some(_) => "written".green(),
            None => "write failed".yellow(),
        };
        println!(
            "  {} {} ({}, {})",
            "+".green(),
            file.path.as_str().cyan(),
            file.format,
            state
        );
    }

    Ok(())
}
