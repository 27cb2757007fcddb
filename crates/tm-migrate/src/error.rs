//! Error types for the migration and seed runners

use crate::runner::MigrationReport;
use thiserror::Error;
use tm_core::CoreError;
use tm_store::StoreError;

/// Runner errors.
///
/// Seed failures never surface here; they are logged and reported per seed.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Migration units could not be listed (M001)
    #[error("[M001] Migration discovery failed: {0}")]
    Discovery(#[from] CoreError),

    /// A migration unit file could not be loaded (M002)
    #[error("[M002] Invalid migration unit {path}: {reason}")]
    InvalidUnit { path: String, reason: String },

    /// Ledger collection unreachable or write failed (M003)
    #[error("[M003] Migration ledger {operation} failed: {source}")]
    Ledger {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    /// Ledger contains a document that is not a valid entry (M004)
    #[error("[M004] Corrupt ledger entry: {0}")]
    CorruptLedger(String),

    /// A migration's `up` raised an error or returned `false` (M005)
    #[error("[M005] Migration '{id}' failed: {reason}")]
    MigrationFailed {
        id: String,
        reason: String,
        /// Outcomes up to the failure; units after it are `Pending`
        report: Box<MigrationReport>,
    },

    /// Two units registered under the same identifier (M006)
    #[error("[M006] Duplicate migration identifier: {0}")]
    DuplicateMigration(String),

    /// Two seeds registered under the same name (M007)
    #[error("[M007] Duplicate seed name: {0}")]
    DuplicateSeed(String),

    /// Seed registered under a name that is not a valid seed name (M008)
    #[error("[M008] {0}")]
    InvalidSeedName(String),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;
