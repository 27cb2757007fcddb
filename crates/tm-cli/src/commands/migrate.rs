//! Migrate command implementation

use anyhow::{Context, Result};
use tm_migrate::{MigrateError, MigrationOptions, MigrationReport, MigrationRunner, MigrationState};

use crate::cli::{GlobalArgs, MigrateArgs, ReportOutput};
use crate::commands::common::{self, ExitCode, EXIT_MIGRATION_FAILED};

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let project = common::load_project(global)?;
    let store = common::open_store(&project, global)?;
    let options = MigrationOptions::from_config(&project.config, &project.root);
    let runner = MigrationRunner::new(store, options);

    match runner.run().await {
        Ok(report) => print_report(&report, args.output),
        Err(MigrateError::MigrationFailed { id, reason, report }) => {
            print_report(&report, args.output)?;
            eprintln!("Migration {} failed: {}", id, reason);
            Err(ExitCode(EXIT_MIGRATION_FAILED).into())
        }
        Err(
            e @ (MigrateError::Ledger { .. } | MigrateError::CorruptLedger(_)),
        ) => {
            eprintln!("Error: {}", e);
            Err(ExitCode(EXIT_MIGRATION_FAILED).into())
        }
        Err(e) => Err(e).context("Failed to load migrations"),
    }
}

fn print_report(report: &MigrationReport, output: ReportOutput) -> Result<()> {
    if output == ReportOutput::Json {
        let json =
            serde_json::to_string_pretty(report).context("Failed to serialize to JSON")?;
        println!("{}", json);
        return Ok(());
    }

    if report.outcomes.is_empty() {
        println!("No migrations found.");
        return Ok(());
    }
    for outcome in &report.outcomes {
        let marker = match outcome.state {
            MigrationState::Applied => "✓",
            MigrationState::AlreadyApplied => "=",
            MigrationState::Failed => "✗",
            _ => "·",
        };
        println!("  {} {}", marker, outcome.id);
    }
    println!();
    println!(
        "Applied {} migrations ({} already applied, {} not run)",
        report.applied().len(),
        report.already_applied().len(),
        report.pending().len()
    );
    Ok(())
}
