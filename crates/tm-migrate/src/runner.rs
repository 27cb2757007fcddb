//! Migration runner.
//!
//! Each unit moves through `Discovered -> {AlreadyApplied | Pending}` and
//! `Pending -> Applying -> {Applied | Failed}`. Units are applied one at a
//! time in identifier order; the ledger write for a unit completes before the
//! next unit starts. The first failure stops the run: earlier units stay
//! recorded, the failed unit is not recorded, later units are not invoked.

use crate::error::{MigrateError, MigrateResult};
use crate::ledger::{LedgerEntry, MigrationLedger};
use crate::registry::MigrationRegistry;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tm_core::{Config, MigrationId};
use tm_store::DocumentStore;

/// Runner invocation parameters
#[derive(Debug, Clone)]
pub struct MigrationOptions {
    /// Database holding the ledger and default database for unit files
    pub database: String,

    /// Ledger collection name
    pub migration_collection: String,

    /// Directory scanned for migration unit files
    pub migrations_path: PathBuf,
}

impl MigrationOptions {
    pub fn from_config(config: &Config, root: &Path) -> Self {
        Self {
            database: config.database.clone(),
            migration_collection: config.migration_collection.clone(),
            migrations_path: config.migrations_path_absolute(root),
        }
    }
}

/// Lifecycle state of a migration unit within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationState {
    Discovered,
    AlreadyApplied,
    Pending,
    Applying,
    Applied,
    Failed,
}

/// Final state of one unit after a run
#[derive(Debug, Clone, Serialize)]
pub struct MigrationOutcome {
    pub id: MigrationId,
    pub state: MigrationState,
}

/// Per-unit outcomes of a run, in application order
#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationReport {
    pub outcomes: Vec<MigrationOutcome>,
}

impl MigrationReport {
    fn ids_in(&self, state: MigrationState) -> Vec<&MigrationId> {
        self.outcomes
            .iter()
            .filter(|o| o.state == state)
            .map(|o| &o.id)
            .collect()
    }

    /// Units applied by this run
    pub fn applied(&self) -> Vec<&MigrationId> {
        self.ids_in(MigrationState::Applied)
    }

    /// Units skipped because the ledger already had them
    pub fn already_applied(&self) -> Vec<&MigrationId> {
        self.ids_in(MigrationState::AlreadyApplied)
    }

    /// Units never reached because an earlier unit failed
    pub fn pending(&self) -> Vec<&MigrationId> {
        self.ids_in(MigrationState::Pending)
    }

    /// The unit that stopped the run, if any
    pub fn failed(&self) -> Option<&MigrationId> {
        self.ids_in(MigrationState::Failed).into_iter().next()
    }

    fn mark_unreached(&mut self) {
        for outcome in &mut self.outcomes {
            if outcome.state == MigrationState::Discovered {
                outcome.state = MigrationState::Pending;
            }
        }
    }
}

/// Applied/pending view of one migration, for `status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub identifier: String,

    /// When it was applied, `None` if pending
    pub applied_at: Option<DateTime<Utc>>,

    /// Whether a unit with this identifier is still registered.
    /// `false` means the ledger references a unit that no longer exists.
    pub available: bool,
}

/// Discovers, filters, and sequentially applies migrations
pub struct MigrationRunner {
    store: Arc<dyn DocumentStore>,
    options: MigrationOptions,
    registered: MigrationRegistry,
}

impl MigrationRunner {
    pub fn new(store: Arc<dyn DocumentStore>, options: MigrationOptions) -> Self {
        Self {
            store,
            options,
            registered: MigrationRegistry::new(),
        }
    }

    /// Add code-defined units, merged with the discovered files on every run.
    pub fn with_registry(mut self, registry: MigrationRegistry) -> Self {
        self.registered = registry;
        self
    }

    pub fn options(&self) -> &MigrationOptions {
        &self.options
    }

    pub fn ledger(&self) -> MigrationLedger {
        MigrationLedger::new(
            self.store.clone(),
            &self.options.database,
            &self.options.migration_collection,
        )
    }

    /// Build the full unit table: files in `migrations_path` plus registered units.
    ///
    /// Rebuilt on every call so each run sees the current directory contents.
    pub fn collect(&self) -> MigrateResult<MigrationRegistry> {
        let mut registry =
            MigrationRegistry::discover(&self.options.migrations_path, &self.options.database)
                .inspect_err(|e| {
                    log::error!(path:% = self.options.migrations_path.display(), error:% = e; "Unable to discover migrations");
                })?;
        registry.extend(self.registered.clone())?;
        Ok(registry)
    }

    /// Discover and apply every pending migration.
    pub async fn run(&self) -> MigrateResult<MigrationReport> {
        log::info!("Running migrations...");
        let ledger = self.ledger();
        ledger.ensure_exists().await.inspect_err(log_abort)?;
        let registry = self.collect()?;
        self.apply_with(&ledger, &registry).await
    }

    /// Apply the pending units of an already-built registry.
    pub async fn apply(&self, registry: &MigrationRegistry) -> MigrateResult<MigrationReport> {
        let ledger = self.ledger();
        ledger.ensure_exists().await.inspect_err(log_abort)?;
        self.apply_with(&ledger, registry).await
    }

    async fn apply_with(
        &self,
        ledger: &MigrationLedger,
        registry: &MigrationRegistry,
    ) -> MigrateResult<MigrationReport> {
        let mut report = MigrationReport {
            outcomes: registry
                .ids()
                .map(|id| MigrationOutcome {
                    id: id.clone(),
                    state: MigrationState::Discovered,
                })
                .collect(),
        };

        for (slot, (id, unit)) in registry.iter().enumerate() {
            if ledger.is_applied(id).await.inspect_err(log_abort)? {
                log::debug!(migration:% = id; "Skipping already applied migration");
                report.outcomes[slot].state = MigrationState::AlreadyApplied;
                continue;
            }
            report.outcomes[slot].state = MigrationState::Applying;

            let failure = match unit.up(self.store.as_ref()).await {
                Ok(true) => None,
                Ok(false) => Some("up() reported failure".to_string()),
                Err(e) => Some(format!("{e:#}")),
            };
            if let Some(reason) = failure {
                report.outcomes[slot].state = MigrationState::Failed;
                report.mark_unreached();
                log::error!(migration:% = id, reason:% = reason; "Migration failed, aborting remaining migrations");
                return Err(MigrateError::MigrationFailed {
                    id: id.to_string(),
                    reason,
                    report: Box::new(report),
                });
            }

            ledger.mark_applied(id).await.inspect_err(|e| {
                log::error!(migration:% = id, error:% = e; "Migration applied but could not be recorded in the ledger");
            })?;
            report.outcomes[slot].state = MigrationState::Applied;
            log::info!(filename:% = id; "-- applied migration");
        }

        log::info!(
            applied = report.applied().len(),
            skipped = report.already_applied().len();
            "Finished running migrations"
        );
        Ok(report)
    }

    /// Applied/pending state of every known migration without applying anything.
    ///
    /// Ledger entries whose unit is no longer registered are listed with
    /// `available: false`.
    pub async fn status(&self) -> MigrateResult<Vec<MigrationStatus>> {
        let registry = self.collect()?;
        let mut applied: HashMap<String, LedgerEntry> = self
            .ledger()
            .entries()
            .await?
            .into_iter()
            .map(|e| (e.migration_identifier.clone(), e))
            .collect();

        let mut statuses: Vec<MigrationStatus> = registry
            .ids()
            .map(|id| MigrationStatus {
                identifier: id.to_string(),
                applied_at: applied.remove(id.as_str()).map(|e| e.applied_at),
                available: true,
            })
            .collect();

        let mut orphans: Vec<LedgerEntry> = applied.into_values().collect();
        orphans.sort_by(|a, b| a.migration_identifier.cmp(&b.migration_identifier));
        statuses.extend(orphans.into_iter().map(|e| MigrationStatus {
            identifier: e.migration_identifier,
            applied_at: Some(e.applied_at),
            available: false,
        }));
        Ok(statuses)
    }
}

fn log_abort(e: &MigrateError) {
    log::error!(error:% = e; "Migration ledger unavailable, aborting");
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
