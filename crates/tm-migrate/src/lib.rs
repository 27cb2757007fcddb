//! tm-migrate - Migration and seed runners for Tidemark
//!
//! Migrations are versioned, ledger-tracked units applied strictly in
//! identifier order; seeds are untracked, re-runnable data loaders applied in
//! manifest order. Units are either declarative files interpreted by
//! [`declarative`] or Rust types registered in a [`registry`] at startup.

pub mod declarative;
pub mod error;
pub mod ledger;
pub mod registry;
pub mod runner;
pub mod seeder;
pub mod unit;

pub use declarative::{FileMigration, FileSeed, Operation};
pub use error::{MigrateError, MigrateResult};
pub use ledger::{LedgerEntry, MigrationLedger};
pub use registry::{MigrationRegistry, SeedRegistry};
pub use runner::{
    MigrationOptions, MigrationOutcome, MigrationReport, MigrationRunner, MigrationState,
    MigrationStatus,
};
pub use seeder::{SeedOutcome, SeedReport, SeedResult, SeedRunner};
pub use unit::{Migration, Seeder};
