//! Seed command implementation

use anyhow::{Context, Result};
use std::path::Path;
use tm_migrate::{SeedOutcome, SeedReport, SeedRunner};

use crate::cli::{GlobalArgs, ReportOutput, SeedArgs};
use crate::commands::common;

/// Trim `--seeds` values and drop empty ones, keeping the given order.
///
/// Each remaining value is checked as a seed name when it is applied.
pub(crate) fn seed_entries(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Execute the seed command
///
/// Seed failures are reported but never change the exit status.
pub async fn execute(args: &SeedArgs, global: &GlobalArgs) -> Result<()> {
    let project = common::load_project(global)?;
    let store = common::open_store(&project, global)?;
    let mut runner = SeedRunner::from_config(store, &project.config, &project.root);
    if let Some(manifest) = &args.manifest {
        runner = runner.with_manifest(Path::new(manifest));
    }

    let report = match &args.seeds {
        Some(values) => {
            let entries = seed_entries(values);
            if entries.is_empty() {
                println!("No seeders given.");
                return Ok(());
            }
            runner.apply_entries(&entries).await
        }
        None => runner.apply_default_manifest().await,
    };

    match args.output {
        ReportOutput::Text => print_report(&report),
        ReportOutput::Json => {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize to JSON")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn print_report(report: &SeedReport) {
    if let Some(reason) = &report.skipped {
        println!("No seeders applied: {}", reason);
        return;
    }

    for result in &report.results {
        match &result.outcome {
            SeedOutcome::Applied => println!("  ✓ {}", result.name),
            SeedOutcome::Missing => println!("  ? {} (not found)", result.name),
            SeedOutcome::Failed { error } => println!("  ✗ {} - {}", result.name, error),
        }
    }
    println!();
    println!(
        "Applied {} seeders ({} missing, {} failed)",
        report.applied(),
        report.missing(),
        report.failed()
    );
}
