//! Migration ledger.
//!
//! Applied migrations are recorded as documents of the form
//! `{ migrationIdentifier, appliedAt }` in a dedicated collection, with a
//! unique index on `migrationIdentifier`. The ledger is the only source of
//! truth for "has this migration already run".

use crate::error::{MigrateError, MigrateResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tm_core::MigrationId;
use tm_store::{DocumentStore, Filter, IndexSpec};

/// Ledger field holding the migration identifier
pub const LEDGER_ID_FIELD: &str = "migrationIdentifier";

/// One applied migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub migration_identifier: String,
    pub applied_at: DateTime<Utc>,
}

/// Ledger collection bound to a store handle
pub struct MigrationLedger {
    store: Arc<dyn DocumentStore>,
    database: String,
    collection: String,
}

impl MigrationLedger {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        database: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            store,
            database: database.into(),
            collection: collection.into(),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Create the ledger collection and its unique index if absent.
    ///
    /// Safe to call on every startup.
    pub async fn ensure_exists(&self) -> MigrateResult<()> {
        let ledger_err = |source| MigrateError::Ledger {
            operation: "setup",
            source,
        };

        let exists = self
            .store
            .collection_exists(&self.database, &self.collection)
            .await
            .map_err(ledger_err)?;
        if !exists {
            self.store
                .create_collection(&self.database, &self.collection)
                .await
                .map_err(ledger_err)?;
            log::info!(database:% = self.database, collection:% = self.collection; "Created migration ledger");
        }

        self.store
            .create_index(
                &self.database,
                &self.collection,
                IndexSpec::new([LEDGER_ID_FIELD]).unique(true),
            )
            .await
            .map_err(ledger_err)
    }

    /// Whether a ledger entry exists for `id`.
    pub async fn is_applied(&self, id: &MigrationId) -> MigrateResult<bool> {
        let count = self
            .store
            .count(
                &self.database,
                &self.collection,
                &Filter::eq(LEDGER_ID_FIELD, id.as_str()),
            )
            .await
            .map_err(|source| MigrateError::Ledger {
                operation: "lookup",
                source,
            })?;
        Ok(count > 0)
    }

    /// Record `id` as applied now.
    ///
    /// Must only be called after the migration's `up` succeeded. The unique
    /// index turns a second call for the same id into an error.
    pub async fn mark_applied(&self, id: &MigrationId) -> MigrateResult<LedgerEntry> {
        let entry = LedgerEntry {
            migration_identifier: id.to_string(),
            applied_at: Utc::now(),
        };
        let doc = match serde_json::to_value(&entry) {
            Ok(serde_json::Value::Object(doc)) => doc,
            _ => {
                return Err(MigrateError::CorruptLedger(format!(
                    "could not encode entry for '{id}'"
                )))
            }
        };

        self.store
            .insert_one(&self.database, &self.collection, doc)
            .await
            .map_err(|source| MigrateError::Ledger {
                operation: "write",
                source,
            })?;
        Ok(entry)
    }

    /// All entries, ordered by migration identifier.
    ///
    /// Identifiers that no longer parse sort after valid ones.
    pub async fn entries(&self) -> MigrateResult<Vec<LedgerEntry>> {
        let docs = self
            .store
            .find(&self.database, &self.collection, &Filter::all())
            .await
            .map_err(|source| MigrateError::Ledger {
                operation: "read",
                source,
            })?;

        let mut entries = docs
            .into_iter()
            .map(|doc| {
                serde_json::from_value::<LedgerEntry>(serde_json::Value::Object(doc))
                    .map_err(|e| MigrateError::CorruptLedger(e.to_string()))
            })
            .collect::<MigrateResult<Vec<_>>>()?;

        entries.sort_by_cached_key(|e| {
            let id = MigrationId::parse(&e.migration_identifier).ok();
            (id.is_none(), id, e.migration_identifier.clone())
        });
        Ok(entries)
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
