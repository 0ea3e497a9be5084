//! Run command implementation

use std::path::Path;

use colored::Colorize;
use export_core::{DecisionFunction, Object, RunEvent, RunOptions, RunReport};
use export_fs::{NormalizedPath, io};
use serde::Deserialize;

use super::Project;
use crate::error::{CliError, Result};

/// Accepted layouts of the objects file
#[derive(Deserialize)]
#[serde(untagged)]
enum ObjectsFile {
    List(Vec<Object>),
    Wrapped { objects: Vec<Object> },
}

impl ObjectsFile {
    fn into_objects(self) -> Vec<Object> {
        match self {
            Self::List(objects) | Self::Wrapped { objects } => objects,
        }
    }
}

fn read_objects(path: &Path) -> Result<Vec<Object>> {
    let content = io::read_text(&NormalizedPath::new(path))?;
    let file: ObjectsFile = serde_json::from_str(&content).map_err(|e| {
        CliError::user(format!(
            "{} is not a list of objects: {e}",
            path.display()
        ))
    })?;
    Ok(file.into_objects())
}

/// Run the export
///
/// Per-file failures are printed but do not fail the command.
pub fn run_export(config: &Path, objects: &Path, dry_run: bool, json: bool) -> Result<()> {
    let project = Project::load(config)?;
    let objects = read_objects(objects)?;
    let rules = project.manifest.rule_set();
    let options = RunOptions { dry_run };

    let output = project.engine.transform(
        objects,
        rules.as_ref().map(|rules| rules as &dyn DecisionFunction),
        options,
    )?;

    if json {
        let report = output.report.unwrap_or_else(|| RunReport::new(dry_run));
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let Some(report) = output.report else {
        println!(
            "{} No rules configured; {} objects passed through untouched.",
            "=>".blue().bold(),
            output.objects.len()
        );
        return Ok(());
    };

    print_report(&report, output.objects.len());
    Ok(())
}

fn print_report(report: &RunReport, object_count: usize) {
    let heading = if report.dry_run {
        "Dry run of export"
    } else {
        "Exporting"
    };
    println!("{} {} ({} objects)...", "=>".blue().bold(), heading, object_count);

    for event in &report.events {
        match event {
            RunEvent::Created { .. } | RunEvent::WouldCreate { .. } => {
                println!("   {} {}", "+".green(), event);
            }
            RunEvent::Deleted { .. } | RunEvent::WouldDelete { .. } => {
                println!("   {} {}", "-".yellow(), event);
            }
            RunEvent::CreateFailed { reason, .. }
            | RunEvent::DeleteFailed { reason, .. } => {
                println!("   {} {} ({})", "!".red(), event, reason.dimmed());
            }
            RunEvent::ObjectFailed { .. } => {
                println!("   {} {}", "!".red(), event);
            }
        }
    }

    if report.events.is_empty() {
        println!("{} Nothing to export.", "OK".green().bold());
    } else if report.success() {
        println!("{} Export complete.", "OK".green().bold());
    } else {
        println!(
            "{} Export finished with {} failure(s).",
            "WARN".yellow().bold(),
            report.failures().count()
        );
    }
}
