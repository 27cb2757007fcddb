//! Embedded in-memory document store
//!
//! [`MemoryStore`] keeps every database in process memory behind a mutex.
//! When opened with a path it loads a JSON snapshot on start and rewrites the
//! snapshot after each mutation, so ledger state survives between CLI runs.

use crate::document::{Document, Filter, IndexSpec, ID_FIELD};
use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tm_core::MEMORY_STORE;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    databases: BTreeMap<String, BTreeMap<String, CollectionState>>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct CollectionState {
    documents: Vec<Document>,
    indexes: Vec<IndexSpec>,
}

impl StoreState {
    fn collection(&self, database: &str, collection: &str) -> Option<&CollectionState> {
        self.databases.get(database)?.get(collection)
    }

    fn collection_mut(
        &mut self,
        database: &str,
        collection: &str,
    ) -> Option<&mut CollectionState> {
        self.databases.get_mut(database)?.get_mut(collection)
    }

    /// Get a collection, creating it implicitly if missing
    fn collection_or_create(&mut self, database: &str, collection: &str) -> &mut CollectionState {
        self.databases
            .entry(database.to_string())
            .or_default()
            .entry(collection.to_string())
            .or_default()
    }
}

impl CollectionState {
    fn unique_indexes(&self) -> impl Iterator<Item = &IndexSpec> {
        self.indexes.iter().filter(|i| i.unique)
    }

    /// Check a new document against existing ones without scanning the whole
    /// collection twice.
    fn check_insert(&self, collection: &str, doc: &Document) -> StoreResult<()> {
        let id = doc.get(ID_FIELD);
        if self.documents.iter().any(|d| d.get(ID_FIELD) == id) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                index: ID_FIELD.to_string(),
                key: id.map(Value::to_string).unwrap_or_default(),
            });
        }
        for index in self.unique_indexes() {
            let key = index.key_of(doc);
            if self.documents.iter().any(|d| index.key_of(d) == key) {
                return Err(StoreError::DuplicateKey {
                    collection: collection.to_string(),
                    index: index.name.clone(),
                    key: Value::Array(key).to_string(),
                });
            }
        }
        Ok(())
    }

    /// Verify every unique constraint across the whole collection
    fn check_all_unique(&self, collection: &str) -> StoreResult<()> {
        let id_index = IndexSpec::new([ID_FIELD]).named(ID_FIELD).unique(true);
        for index in std::iter::once(&id_index).chain(self.unique_indexes()) {
            let mut seen = HashSet::new();
            for doc in &self.documents {
                let key = Value::Array(index.key_of(doc)).to_string();
                if !seen.insert(key.clone()) {
                    return Err(StoreError::DuplicateKey {
                        collection: collection.to_string(),
                        index: index.name.clone(),
                        key,
                    });
                }
            }
        }
        Ok(())
    }

    fn insert(&mut self, collection: &str, mut doc: Document) -> StoreResult<()> {
        if !doc.contains_key(ID_FIELD) {
            doc.insert(
                ID_FIELD.to_string(),
                Value::String(uuid::Uuid::new_v4().to_string()),
            );
        }
        self.check_insert(collection, &doc)?;
        self.documents.push(doc);
        Ok(())
    }
}

/// Embedded document store
pub struct MemoryStore {
    state: Mutex<StoreState>,
    snapshot: Option<PathBuf>,
}

impl MemoryStore {
    /// Create an empty store that is never written to disk
    pub fn in_memory() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            snapshot: None,
        }
    }

    /// Open a store backed by the snapshot file at `path`.
    ///
    /// A missing file starts an empty store; the file is created on the first write.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let state = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| StoreError::Snapshot {
                path: path.display().to_string(),
                source: e,
            })?;
            serde_json::from_str(&content).map_err(|e| {
                StoreError::ConnectionError(format!("corrupt snapshot {}: {}", path.display(), e))
            })?
        } else {
            StoreState::default()
        };
        log::debug!(path:% = path.display(); "Opened document store snapshot");
        Ok(Self {
            state: Mutex::new(state),
            snapshot: Some(path.to_path_buf()),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> StoreResult<Self> {
        if path == MEMORY_STORE {
            Ok(Self::in_memory())
        } else {
            Self::open(Path::new(path))
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|e| StoreError::MutexPoisoned(e.to_string()))
    }

    /// Run a mutation under the lock and persist the snapshot if it succeeded.
    fn mutate<T>(&self, body: impl FnOnce(&mut StoreState) -> StoreResult<T>) -> StoreResult<T> {
        let mut state = self.lock()?;
        let result = body(&mut state)?;
        self.persist(&state)?;
        Ok(result)
    }

    /// Write the snapshot atomically (write-to-temp-then-rename)
    fn persist(&self, state: &StoreState) -> StoreResult<()> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        let io_err = |e| StoreError::Snapshot {
            path: path.display().to_string(),
            source: e,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let temp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&temp_path, json).map_err(io_err)?;
        fs::rename(&temp_path, path).map_err(io_err)?;
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn not_found(database: &str, collection: &str) -> StoreError {
    StoreError::CollectionNotFound {
        database: database.to_string(),
        collection: collection.to_string(),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn collection_exists(&self, database: &str, collection: &str) -> StoreResult<bool> {
        Ok(self.lock()?.collection(database, collection).is_some())
    }

    async fn list_collections(&self, database: &str) -> StoreResult<Vec<String>> {
        let state = self.lock()?;
        Ok(state
            .databases
            .get(database)
            .map(|colls| colls.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn create_collection(&self, database: &str, collection: &str) -> StoreResult<()> {
        if collection.is_empty() || collection.contains('$') {
            return Err(StoreError::InvalidRequest(format!(
                "invalid collection name '{collection}'"
            )));
        }
        self.mutate(|state| {
            if state.collection(database, collection).is_some() {
                return Err(StoreError::CollectionExists {
                    database: database.to_string(),
                    collection: collection.to_string(),
                });
            }
            state.collection_or_create(database, collection);
            Ok(())
        })
    }

    async fn drop_collection(&self, database: &str, collection: &str) -> StoreResult<()> {
        self.mutate(|state| {
            let colls = state
                .databases
                .get_mut(database)
                .ok_or_else(|| not_found(database, collection))?;
            colls
                .remove(collection)
                .ok_or_else(|| not_found(database, collection))?;
            if colls.is_empty() {
                state.databases.remove(database);
            }
            Ok(())
        })
    }

    async fn create_index(
        &self,
        database: &str,
        collection: &str,
        index: IndexSpec,
    ) -> StoreResult<()> {
        if index.keys.is_empty() {
            return Err(StoreError::InvalidRequest(format!(
                "index '{}' has no keys",
                index.name
            )));
        }
        self.mutate(|state| {
            let coll = state.collection_or_create(database, collection);
            if let Some(existing) = coll.indexes.iter().find(|i| i.name == index.name) {
                if *existing == index {
                    return Ok(());
                }
                return Err(StoreError::IndexConflict {
                    collection: collection.to_string(),
                    name: index.name,
                });
            }
            let mut candidate = coll.clone();
            candidate.indexes.push(index);
            candidate.check_all_unique(collection)?;
            *coll = candidate;
            Ok(())
        })
    }

    async fn drop_index(&self, database: &str, collection: &str, name: &str) -> StoreResult<()> {
        self.mutate(|state| {
            let coll = state
                .collection_mut(database, collection)
                .ok_or_else(|| not_found(database, collection))?;
            let before = coll.indexes.len();
            coll.indexes.retain(|i| i.name != name);
            if coll.indexes.len() == before {
                return Err(StoreError::IndexNotFound {
                    collection: collection.to_string(),
                    name: name.to_string(),
                });
            }
            Ok(())
        })
    }

    async fn list_indexes(&self, database: &str, collection: &str) -> StoreResult<Vec<IndexSpec>> {
        let state = self.lock()?;
        state
            .collection(database, collection)
            .map(|c| c.indexes.clone())
            .ok_or_else(|| not_found(database, collection))
    }

    async fn insert_one(
        &self,
        database: &str,
        collection: &str,
        doc: Document,
    ) -> StoreResult<()> {
        self.mutate(|state| state.collection_or_create(database, collection).insert(collection, doc))
    }

    async fn insert_many(
        &self,
        database: &str,
        collection: &str,
        docs: Vec<Document>,
    ) -> StoreResult<usize> {
        self.mutate(|state| {
            let coll = state.collection_or_create(database, collection);
            let mut candidate = coll.clone();
            let count = docs.len();
            for doc in docs {
                candidate.insert(collection, doc)?;
            }
            *coll = candidate;
            Ok(count)
        })
    }

    async fn find(
        &self,
        database: &str,
        collection: &str,
        filter: &Filter,
    ) -> StoreResult<Vec<Document>> {
        let state = self.lock()?;
        Ok(state
            .collection(database, collection)
            .map(|c| {
                c.documents
                    .iter()
                    .filter(|d| filter.matches(d))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count(
        &self,
        database: &str,
        collection: &str,
        filter: &Filter,
    ) -> StoreResult<usize> {
        let state = self.lock()?;
        Ok(state
            .collection(database, collection)
            .map(|c| c.documents.iter().filter(|d| filter.matches(d)).count())
            .unwrap_or(0))
    }

    async fn update_many(
        &self,
        database: &str,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> StoreResult<usize> {
        if set.contains_key(ID_FIELD) {
            return Err(StoreError::InvalidRequest(
                "the _id field cannot be updated".to_string(),
            ));
        }
        self.mutate(|state| {
            let Some(coll) = state.collection_mut(database, collection) else {
                return Ok(0);
            };
            let mut candidate = coll.clone();
            let mut matched = 0;
            for doc in candidate.documents.iter_mut().filter(|d| filter.matches(d)) {
                for (field, value) in &set {
                    doc.insert(field.clone(), value.clone());
                }
                matched += 1;
            }
            if matched > 0 {
                candidate.check_all_unique(collection)?;
                *coll = candidate;
            }
            Ok(matched)
        })
    }

    async fn delete_many(
        &self,
        database: &str,
        collection: &str,
        filter: &Filter,
    ) -> StoreResult<usize> {
        self.mutate(|state| {
            let Some(coll) = state.collection_mut(database, collection) else {
                return Ok(0);
            };
            let before = coll.documents.len();
            coll.documents.retain(|d| !filter.matches(d));
            Ok(before - coll.documents.len())
        })
    }

    fn store_type(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
