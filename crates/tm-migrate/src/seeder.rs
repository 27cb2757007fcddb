//! Seed runner.
//!
//! Seeds are applied one at a time in the order given. A seed that is missing,
//! cannot be loaded, or fails while running is logged and reported; the batch
//! always continues with the next seed. A manifest or command-line entry that
//! is not a valid seed name fails on its own in the same way. Nothing is
//! recorded in the store about which seeds ran.

use crate::declarative::FileSeed;
use crate::registry::SeedRegistry;
use crate::unit::Seeder;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tm_core::{Config, SeedManifest, SeedName};
use tm_store::DocumentStore;

/// Manifest file name looked up in the seeders directory by default
pub const DEFAULT_MANIFEST: &str = "default.json";

/// What happened to one seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SeedOutcome {
    Applied,
    /// No registered seeder and no regular file under the name
    Missing,
    Failed {
        error: String,
    },
}

/// Outcome of one seed, with the file it resolved to (`None` for registered seeders)
#[derive(Debug, Clone, Serialize)]
pub struct SeedResult {
    pub name: String,
    pub file: Option<PathBuf>,
    #[serde(flatten)]
    pub outcome: SeedOutcome,
}

/// Outcomes of a seed batch, in execution order
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub results: Vec<SeedResult>,

    /// Set when the manifest could not be used and no seed ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

impl SeedReport {
    fn count(&self, pred: impl Fn(&SeedOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn applied(&self) -> usize {
        self.count(|o| *o == SeedOutcome::Applied)
    }

    pub fn missing(&self) -> usize {
        self.count(|o| *o == SeedOutcome::Missing)
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SeedOutcome::Failed { .. }))
    }
}

/// Resolves seed names and runs them against a store
pub struct SeedRunner {
    store: Arc<dyn DocumentStore>,
    seed_dir: PathBuf,
    manifest: PathBuf,
    default_database: String,
    registry: SeedRegistry,
}

impl SeedRunner {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        seed_dir: impl Into<PathBuf>,
        default_database: impl Into<String>,
    ) -> Self {
        let seed_dir = seed_dir.into();
        Self {
            store,
            manifest: seed_dir.join(DEFAULT_MANIFEST),
            seed_dir,
            default_database: default_database.into(),
            registry: SeedRegistry::new(),
        }
    }

    /// Runner for a project: seeders directory, manifest, and database from `config`.
    pub fn from_config(store: Arc<dyn DocumentStore>, config: &Config, root: &Path) -> Self {
        Self::new(store, config.seeders_path_absolute(root), &config.database)
            .with_manifest(config.seed_manifest_absolute(root))
    }

    /// Code-defined seeders, consulted before the seeders directory.
    pub fn with_registry(mut self, registry: SeedRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_manifest(mut self, manifest: impl Into<PathBuf>) -> Self {
        self.manifest = manifest.into();
        self
    }

    pub fn seed_dir(&self) -> &Path {
        &self.seed_dir
    }

    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    /// Resolve and run a single seed. Never fails; the outcome says what happened.
    pub async fn apply_seed(&self, name: &SeedName) -> SeedResult {
        if let Some(seeder) = self.registry.get(name) {
            let outcome = self.execute(name, "registered", seeder.as_ref()).await;
            return SeedResult {
                name: name.to_string(),
                file: None,
                outcome,
            };
        }

        let file = name.resolve(&self.seed_dir);
        let outcome = if !is_regular_file(&file) {
            log::warn!(seeder:% = name, file:% = file.display(); "Unable to find seeder!");
            SeedOutcome::Missing
        } else {
            match FileSeed::load(&file, &self.default_database) {
                Ok(seed) => {
                    self.execute(name, &file.display().to_string(), &seed)
                        .await
                }
                Err(e) => {
                    log::error!(seeder:% = name, file:% = file.display(), error:% = e; "Unable to apply seeder!");
                    SeedOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            }
        };
        SeedResult {
            name: name.to_string(),
            file: Some(file),
            outcome,
        }
    }

    async fn execute(&self, name: &SeedName, source: &str, seeder: &dyn Seeder) -> SeedOutcome {
        match seeder.run(self.store.as_ref()).await {
            Ok(()) => {
                log::info!(seeder:% = name, file = source; "-- successfully applied seeder");
                SeedOutcome::Applied
            }
            Err(e) => {
                let error = format!("{e:#}");
                log::error!(seeder:% = name, file = source, error:% = error; "Unable to apply seeder!");
                SeedOutcome::Failed { error }
            }
        }
    }

    /// Run `names` strictly in order.
    pub async fn apply_all(&self, names: &[SeedName]) -> SeedReport {
        let mut report = SeedReport::default();
        for name in names {
            report.results.push(self.apply_seed(name).await);
        }
        report
    }

    /// Run unvalidated entries in order. An entry that is not a valid seed
    /// name is reported `Failed` and the batch moves on.
    pub async fn apply_entries(&self, entries: &[String]) -> SeedReport {
        let mut report = SeedReport::default();
        for entry in entries {
            let result = match SeedName::try_new(entry.as_str()) {
                Ok(name) => self.apply_seed(&name).await,
                Err(reason) => {
                    log::warn!(seeder:% = entry, reason:% = reason; "Invalid seeder name, skipping");
                    SeedResult {
                        name: entry.clone(),
                        file: None,
                        outcome: SeedOutcome::Failed { error: reason },
                    }
                }
            };
            report.results.push(result);
        }
        report
    }

    /// Run every seed listed in the manifest at `path`.
    ///
    /// An absent, unreadable, or malformed manifest logs a warning and runs
    /// nothing.
    pub async fn apply_manifest(&self, path: &Path) -> SeedReport {
        let manifest = match SeedManifest::load(path) {
            Ok(manifest) => manifest,
            Err(e) => {
                log::warn!(file:% = path.display(), reason:% = e; "Unable to load seed manifest, no seeders applied");
                return SeedReport {
                    results: Vec::new(),
                    skipped: Some(e.to_string()),
                };
            }
        };

        let report = self.apply_entries(&manifest.seeders).await;
        log::info!(
            applied = report.applied(),
            missing = report.missing(),
            failed = report.failed();
            "Finished running {} default seeders!",
            manifest.len()
        );
        report
    }

    /// Run the configured default manifest.
    pub async fn apply_default_manifest(&self) -> SeedReport {
        self.apply_manifest(&self.manifest).await
    }
}

/// Symlinks and directories do not count as seed files.
fn is_regular_file(path: &Path) -> bool {
    std::fs::symlink_metadata(path)
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "seeder_test.rs"]
mod tests;
