//! Capability traits implemented by migration and seed units.

use async_trait::async_trait;
use tm_store::DocumentStore;

/// A versioned, ledger-tracked schema change.
///
/// Units are registered by identifier in a
/// [`MigrationRegistry`](crate::MigrationRegistry); the identifier is not part
/// of the trait so the same type can back several registrations.
#[async_trait]
pub trait Migration: Send + Sync {
    /// Apply the change.
    ///
    /// `Ok(false)` reports failure without an error value and is handled the
    /// same as `Err`: the migration is not marked applied and the run stops.
    async fn up(&self, store: &dyn DocumentStore) -> anyhow::Result<bool>;

    /// Revert the change. Never invoked by the runner; used for manual rollback.
    async fn down(&self, store: &dyn DocumentStore) -> anyhow::Result<bool>;

    /// Optional human-readable summary
    fn description(&self) -> Option<&str> {
        None
    }
}

/// A re-runnable data loader. Seeds are not tracked in any ledger.
#[async_trait]
pub trait Seeder: Send + Sync {
    async fn run(&self, store: &dyn DocumentStore) -> anyhow::Result<()>;
}
