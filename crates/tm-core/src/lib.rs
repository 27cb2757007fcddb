//! tm-core - Core library for Tidemark
//!
//! This crate provides the shared types used by every Tidemark component:
//! validated migration identifiers, seed names, project configuration,
//! migration file discovery, and the default seed manifest.

pub mod config;
pub mod discovery;
pub mod error;
pub mod format;
pub mod manifest;
pub mod migration_id;
mod newtype_string;
pub mod seed_name;

pub use config::{Config, StoreConfig, MEMORY_STORE};
pub use discovery::{list_migrations, MigrationFile};
pub use error::{CoreError, CoreResult};
pub use format::UnitFormat;
pub use manifest::SeedManifest;
pub use migration_id::MigrationId;
pub use seed_name::SeedName;
