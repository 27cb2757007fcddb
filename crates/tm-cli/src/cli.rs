//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Tidemark - migration and seed runner for document stores
#[derive(Parser, Debug)]
#[command(name = "tm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override store path (snapshot file or `:memory:`)
    #[arg(short, long, global = true, env = "TIDEMARK_STORE")]
    pub store: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations in identifier order
    Migrate(MigrateArgs),

    /// Show applied and pending migrations
    Status(StatusArgs),

    /// Run seeders from the default manifest or a given list
    Seed(SeedArgs),

    /// Create a new, empty migration file
    New(NewArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Output format for the run report
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: ReportOutput,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Human-readable table
    Table,
    /// JSON array
    Json,
}

/// Report output formats for migrate and seed
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutput {
    /// One line per unit
    Text,
    /// JSON report
    Json,
}

/// Arguments for the seed command
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Seeders to run (comma-separated, default: the seed manifest)
    #[arg(long, value_delimiter = ',')]
    pub seeds: Option<Vec<String>>,

    /// Use this manifest instead of the configured one
    #[arg(short, long, conflicts_with = "seeds")]
    pub manifest: Option<String>,

    /// Output format for the seed report
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: ReportOutput,
}

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Migration name, e.g. `users_collection_migration`
    pub slug: String,

    /// File format of the new migration
    #[arg(short, long, value_enum, default_value = "yml")]
    pub format: NewFormat,
}

/// File formats for `tm new`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewFormat {
    Yml,
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
