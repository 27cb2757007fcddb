//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tm_core::Config;
use tm_store::{DocumentStore, MemoryStore};

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

/// Exit code for a migration that failed or a ledger that could not be used
pub(crate) const EXIT_MIGRATION_FAILED: i32 = 3;

impl ExitCode {
    pub(crate) fn as_u8(&self) -> u8 {
        u8::try_from(self.0).unwrap_or(1)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; the command already reported the failure.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// A loaded project: its root directory and parsed configuration
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

/// Load the project config from `--config` or the project directory.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = PathBuf::from(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(&root),
    }
    .context("Failed to load project configuration")?;

    log::debug!(project:% = config.name, root:% = root.display(); "Loaded project");
    Ok(Project { root, config })
}

/// Open the document store named by `--store` or the project config.
pub(crate) fn open_store(project: &Project, global: &GlobalArgs) -> Result<Arc<dyn DocumentStore>> {
    let path = project
        .config
        .store_path(&project.root, global.store.as_deref());
    let store = MemoryStore::new(&path)
        .with_context(|| format!("Failed to open document store at {}", path))?;
    log::debug!(store = store.store_type(), path:% = path; "Opened document store");
    Ok(Arc::new(store))
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
