//! Document store trait definition

use crate::document::{Document, Filter, IndexSpec};
use crate::error::StoreResult;
use async_trait::async_trait;

/// Document store abstraction for Tidemark
///
/// A store hosts named databases, each holding named collections of JSON
/// documents. Implementations must be Send + Sync so a single handle can be
/// shared as `Arc<dyn DocumentStore>` by every runner and unit.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Check if a collection exists
    async fn collection_exists(&self, database: &str, collection: &str) -> StoreResult<bool>;

    /// List collection names in a database, sorted
    async fn list_collections(&self, database: &str) -> StoreResult<Vec<String>>;

    /// Create an empty collection; fails if it already exists
    async fn create_collection(&self, database: &str, collection: &str) -> StoreResult<()>;

    /// Drop a collection and its indexes; fails if it does not exist
    async fn drop_collection(&self, database: &str, collection: &str) -> StoreResult<()>;

    /// Create an index. Creating an identical index again is a no-op.
    async fn create_index(
        &self,
        database: &str,
        collection: &str,
        index: IndexSpec,
    ) -> StoreResult<()>;

    /// Drop an index by name
    async fn drop_index(&self, database: &str, collection: &str, name: &str) -> StoreResult<()>;

    /// List index definitions of a collection
    async fn list_indexes(&self, database: &str, collection: &str) -> StoreResult<Vec<IndexSpec>>;

    /// Insert a document, creating the collection if needed
    async fn insert_one(&self, database: &str, collection: &str, doc: Document)
        -> StoreResult<()>;

    /// Insert several documents; either all are inserted or none
    async fn insert_many(
        &self,
        database: &str,
        collection: &str,
        docs: Vec<Document>,
    ) -> StoreResult<usize>;

    /// Return documents matching `filter` in insertion order
    async fn find(
        &self,
        database: &str,
        collection: &str,
        filter: &Filter,
    ) -> StoreResult<Vec<Document>>;

    /// Count documents matching `filter`
    async fn count(&self, database: &str, collection: &str, filter: &Filter)
        -> StoreResult<usize>;

    /// Overwrite the fields in `set` on every matching document, returns matched rows
    async fn update_many(
        &self,
        database: &str,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> StoreResult<usize>;

    /// Delete matching documents, returns deleted rows
    async fn delete_many(
        &self,
        database: &str,
        collection: &str,
        filter: &Filter,
    ) -> StoreResult<usize>;

    /// Store type identifier for logging
    fn store_type(&self) -> &'static str;
}
