//! Declarative unit files.
//!
//! Migration and seed units on disk are data rather than code: a list of
//! [`Operation`]s interpreted against the store. A migration file looks like
//!
//! ```yaml
//! description: Users collection with a unique email index
//! up:
//!   - op: create_collection
//!     collection: users
//!   - op: create_index
//!     collection: users
//!     keys: [email]
//!     unique: true
//! down:
//!   - op: drop_collection
//!     collection: users
//! ```
//!
//! and a seed file replaces `up`/`down` with `steps`. JSON is accepted as well.

use crate::error::{MigrateError, MigrateResult};
use crate::unit::{Migration, Seeder};
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tm_core::{CoreResult, MigrationFile, MigrationId, UnitFormat};
use tm_store::{Document, DocumentStore, Filter, IndexSpec, StoreResult};

/// A single store operation. `database` overrides the file's database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    CreateCollection {
        collection: String,
        #[serde(default)]
        database: Option<String>,
    },
    DropCollection {
        collection: String,
        #[serde(default)]
        database: Option<String>,
    },
    CreateIndex {
        collection: String,
        keys: Vec<String>,
        #[serde(default)]
        unique: bool,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        database: Option<String>,
    },
    DropIndex {
        collection: String,
        name: String,
        #[serde(default)]
        database: Option<String>,
    },
    Insert {
        collection: String,
        documents: Vec<Document>,
        #[serde(default)]
        database: Option<String>,
    },
    Update {
        collection: String,
        filter: Filter,
        set: Document,
        #[serde(default)]
        database: Option<String>,
    },
    Delete {
        collection: String,
        filter: Filter,
        #[serde(default)]
        database: Option<String>,
    },
}

impl Operation {
    fn database_override(&self) -> Option<&str> {
        match self {
            Operation::CreateCollection { database, .. }
            | Operation::DropCollection { database, .. }
            | Operation::CreateIndex { database, .. }
            | Operation::DropIndex { database, .. }
            | Operation::Insert { database, .. }
            | Operation::Update { database, .. }
            | Operation::Delete { database, .. } => database.as_deref(),
        }
    }

    /// Short label used in error context, e.g. `create_index users`
    pub fn describe(&self) -> String {
        let (op, collection) = match self {
            Operation::CreateCollection { collection, .. } => ("create_collection", collection),
            Operation::DropCollection { collection, .. } => ("drop_collection", collection),
            Operation::CreateIndex { collection, .. } => ("create_index", collection),
            Operation::DropIndex { collection, .. } => ("drop_index", collection),
            Operation::Insert { collection, .. } => ("insert", collection),
            Operation::Update { collection, .. } => ("update", collection),
            Operation::Delete { collection, .. } => ("delete", collection),
        };
        format!("{op} {collection}")
    }

    /// Execute against `store`, using `default_database` unless overridden.
    pub async fn apply(&self, store: &dyn DocumentStore, default_database: &str) -> StoreResult<()> {
        let db = self.database_override().unwrap_or(default_database);
        match self {
            Operation::CreateCollection { collection, .. } => {
                store.create_collection(db, collection).await
            }
            Operation::DropCollection { collection, .. } => {
                store.drop_collection(db, collection).await
            }
            Operation::CreateIndex {
                collection,
                keys,
                unique,
                name,
                ..
            } => {
                let mut spec = IndexSpec::new(keys.iter().cloned()).unique(*unique);
                if let Some(name) = name {
                    spec = spec.named(name.clone());
                }
                store.create_index(db, collection, spec).await
            }
            Operation::DropIndex {
                collection, name, ..
            } => store.drop_index(db, collection, name).await,
            Operation::Insert {
                collection,
                documents,
                ..
            } => store
                .insert_many(db, collection, documents.clone())
                .await
                .map(|_| ()),
            Operation::Update {
                collection,
                filter,
                set,
                ..
            } => store
                .update_many(db, collection, filter, set.clone())
                .await
                .map(|_| ()),
            Operation::Delete {
                collection, filter, ..
            } => store.delete_many(db, collection, filter).await.map(|_| ()),
        }
    }
}

/// Run `steps` in order, stopping at the first failure.
async fn run_steps(
    store: &dyn DocumentStore,
    steps: &[Operation],
    database: &str,
) -> anyhow::Result<()> {
    for (i, step) in steps.iter().enumerate() {
        step.apply(store, database)
            .await
            .with_context(|| format!("step {} ({}) failed", i + 1, step.describe()))?;
    }
    Ok(())
}

/// On-disk shape of a migration unit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationSpec {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    pub up: Vec<Operation>,
    #[serde(default)]
    pub down: Vec<Operation>,
}

/// On-disk shape of a seed unit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedSpec {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    pub steps: Vec<Operation>,
}

/// Migration unit loaded from a file
#[derive(Debug, Clone)]
pub struct FileMigration {
    pub id: MigrationId,
    pub path: PathBuf,
    database: String,
    spec: MigrationSpec,
}

impl FileMigration {
    /// Parse a discovered unit file.
    ///
    /// A file that cannot be parsed is a hard error: the migration list would
    /// otherwise be incomplete.
    pub fn load(file: &MigrationFile, default_database: &str) -> MigrateResult<Self> {
        let spec: MigrationSpec = UnitFormat::load(&file.path).map_err(|e| {
            MigrateError::InvalidUnit {
                path: file.path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        let database = spec
            .database
            .clone()
            .unwrap_or_else(|| default_database.to_string());
        Ok(Self {
            id: file.id.clone(),
            path: file.path.clone(),
            database,
            spec,
        })
    }

    pub fn spec(&self) -> &MigrationSpec {
        &self.spec
    }
}

#[async_trait]
impl Migration for FileMigration {
    async fn up(&self, store: &dyn DocumentStore) -> anyhow::Result<bool> {
        run_steps(store, &self.spec.up, &self.database).await?;
        Ok(true)
    }

    async fn down(&self, store: &dyn DocumentStore) -> anyhow::Result<bool> {
        run_steps(store, &self.spec.down, &self.database).await?;
        Ok(true)
    }

    fn description(&self) -> Option<&str> {
        self.spec.description.as_deref()
    }
}

/// Seed unit loaded from a file
#[derive(Debug, Clone)]
pub struct FileSeed {
    pub path: PathBuf,
    database: String,
    spec: SeedSpec,
}

impl FileSeed {
    pub fn load(path: &Path, default_database: &str) -> CoreResult<Self> {
        let spec: SeedSpec = UnitFormat::load(path)?;
        let database = spec
            .database
            .clone()
            .unwrap_or_else(|| default_database.to_string());
        Ok(Self {
            path: path.to_path_buf(),
            database,
            spec,
        })
    }
}

#[async_trait]
impl Seeder for FileSeed {
    async fn run(&self, store: &dyn DocumentStore) -> anyhow::Result<()> {
        run_steps(store, &self.spec.steps, &self.database).await
    }
}

#[cfg(test)]
#[path = "declarative_test.rs"]
mod tests;
