//! Shared helpers for tm-migrate integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tm_store::{Document, DocumentStore, Filter, IndexSpec, MemoryStore, StoreError, StoreResult};

/// Wraps a `MemoryStore` and fails selected operations on one collection.
pub struct FaultyStore {
    inner: MemoryStore,
    collection: String,
    fail_setup: AtomicBool,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl FaultyStore {
    pub fn new(collection: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::in_memory(),
            collection: collection.to_string(),
            fail_setup: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
        })
    }

    /// Collection and index creation or removal
    pub fn fail_setup(&self, on: bool) {
        self.fail_setup.store(on, Ordering::SeqCst);
    }

    /// Document inserts, updates and deletes
    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    /// Document queries
    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    fn check(&self, collection: &str, flag: &AtomicBool) -> StoreResult<()> {
        if collection == self.collection && flag.load(Ordering::SeqCst) {
            return Err(StoreError::ConnectionError(format!(
                "injected failure on {collection}"
            )));
        }
        Ok(())
    }

    fn check_setup(&self, collection: &str) -> StoreResult<()> {
        self.check(collection, &self.fail_setup)
    }

    fn check_write(&self, collection: &str) -> StoreResult<()> {
        self.check(collection, &self.fail_writes)
    }

    fn check_read(&self, collection: &str) -> StoreResult<()> {
        self.check(collection, &self.fail_reads)
    }
}

#[async_trait]
impl DocumentStore for FaultyStore {
    async fn collection_exists(&self, database: &str, collection: &str) -> StoreResult<bool> {
        self.check_setup(collection)?;
        self.inner.collection_exists(database, collection).await
    }

    async fn list_collections(&self, database: &str) -> StoreResult<Vec<String>> {
        self.inner.list_collections(database).await
    }

    async fn create_collection(&self, database: &str, collection: &str) -> StoreResult<()> {
        self.check_setup(collection)?;
        self.inner.create_collection(database, collection).await
    }

    async fn drop_collection(&self, database: &str, collection: &str) -> StoreResult<()> {
        self.check_setup(collection)?;
        self.inner.drop_collection(database, collection).await
    }

    async fn create_index(
        &self,
        database: &str,
        collection: &str,
        index: IndexSpec,
    ) -> StoreResult<()> {
        self.check_setup(collection)?;
        self.inner.create_index(database, collection, index).await
    }

    async fn drop_index(&self, database: &str, collection: &str, name: &str) -> StoreResult<()> {
        self.check_setup(collection)?;
        self.inner.drop_index(database, collection, name).await
    }

    async fn list_indexes(&self, database: &str, collection: &str) -> StoreResult<Vec<IndexSpec>> {
        self.check_setup(collection)?;
        self.inner.list_indexes(database, collection).await
    }

    async fn insert_one(&self, database: &str, collection: &str, doc: Document) -> StoreResult<()> {
        self.check_write(collection)?;
        self.inner.insert_one(database, collection, doc).await
    }

    async fn insert_many(
        &self,
        database: &str,
        collection: &str,
        docs: Vec<Document>,
    ) -> StoreResult<usize> {
        self.check_write(collection)?;
        self.inner.insert_many(database, collection, docs).await
    }

    async fn find(
        &self,
        database: &str,
        collection: &str,
        filter: &Filter,
    ) -> StoreResult<Vec<Document>> {
        self.check_read(collection)?;
        self.inner.find(database, collection, filter).await
    }

    async fn count(&self, database: &str, collection: &str, filter: &Filter) -> StoreResult<usize> {
        self.check_read(collection)?;
        self.inner.count(database, collection, filter).await
    }

    async fn update_many(
        &self,
        database: &str,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> StoreResult<usize> {
        self.check_write(collection)?;
        self.inner.update_many(database, collection, filter, set).await
    }

    async fn delete_many(
        &self,
        database: &str,
        collection: &str,
        filter: &Filter,
    ) -> StoreResult<usize> {
        self.check_write(collection)?;
        self.inner.delete_many(database, collection, filter).await
    }

    fn store_type(&self) -> &'static str {
        "faulty"
    }
}

/// Write a migration file into `dir`.
pub fn write_unit(dir: &std::path::Path, file: &str, content: &str) {
    std::fs::write(dir.join(file), content).unwrap();
}

/// A migration creating `collection` with a unique index on `email`.
pub fn create_collection_unit(collection: &str) -> String {
    format!(
        "description: create {collection}\nup:\n  - op: create_collection\n    collection: {collection}\n  - op: create_index\n    collection: {collection}\n    keys: [email]\n    unique: true\ndown:\n  - op: drop_collection\n    collection: {collection}\n"
    )
}
