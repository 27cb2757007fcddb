//! Status command implementation

use anyhow::{Context, Result};
use tm_migrate::{MigrationOptions, MigrationRunner, MigrationStatus};

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common;

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let project = common::load_project(global)?;
    let store = common::open_store(&project, global)?;
    let options = MigrationOptions::from_config(&project.config, &project.root);
    let statuses = MigrationRunner::new(store, options)
        .status()
        .await
        .context("Failed to read migration status")?;

    match args.output {
        StatusOutput::Table => print_table(&statuses),
        StatusOutput::Json => print_json(&statuses)?,
    }
    Ok(())
}

fn print_table(statuses: &[MigrationStatus]) {
    if statuses.is_empty() {
        println!("No migrations found.");
        return;
    }

    let name_width = statuses
        .iter()
        .map(|s| s.identifier.len())
        .max()
        .unwrap_or(9)
        .max(9);
    let state_width = 9;

    println!(
        "{:<name_width$}  {:<state_width$}  APPLIED_AT",
        "MIGRATION", "STATUS",
    );
    println!(
        "{:-<name_width$}  {:-<state_width$}  {}",
        "",
        "",
        "-".repeat(25),
    );

    for status in statuses {
        let state = match (status.applied_at.is_some(), status.available) {
            (true, true) => "applied",
            (false, _) => "pending",
            (true, false) => "orphaned",
        };
        let applied_at = status
            .applied_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<name_width$}  {:<state_width$}  {}", status.identifier, state, applied_at);
    }

    let applied = statuses.iter().filter(|s| s.applied_at.is_some()).count();
    println!();
    println!(
        "{} applied, {} pending",
        applied,
        statuses.len() - applied
    );
}

fn print_json(statuses: &[MigrationStatus]) -> Result<()> {
    let json = serde_json::to_string_pretty(statuses).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}
