//! Error types for tm-store

use thiserror::Error;

/// Document store operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Connection error (S001)
    #[error("[S001] Store connection failed: {0}")]
    ConnectionError(String),

    /// Collection already exists (S002)
    #[error("[S002] Collection already exists: {database}.{collection}")]
    CollectionExists {
        database: String,
        collection: String,
    },

    /// Collection not found (S003)
    #[error("[S003] Collection not found: {database}.{collection}")]
    CollectionNotFound {
        database: String,
        collection: String,
    },

    /// Index definition conflicts with an existing one (S004)
    #[error("[S004] Index '{name}' on {collection} conflicts with an existing index")]
    IndexConflict { collection: String, name: String },

    /// Index not found (S005)
    #[error("[S005] Index '{name}' not found on {collection}")]
    IndexNotFound { collection: String, name: String },

    /// Unique index violation (S006)
    #[error("[S006] Duplicate key for index '{index}' on {collection}: {key}")]
    DuplicateKey {
        collection: String,
        index: String,
        key: String,
    },

    /// Invalid argument, e.g. an index without keys (S007)
    #[error("[S007] Invalid store request: {0}")]
    InvalidRequest(String),

    /// Snapshot file could not be read or written (S008)
    #[error("[S008] Snapshot I/O failed for {path}: {source}")]
    Snapshot {
        path: String,
        source: std::io::Error,
    },

    /// Snapshot (de)serialization error (S009)
    #[error("[S009] Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Mutex poisoned (S010)
    #[error("[S010] Store mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for StoreError
pub type StoreResult<T> = Result<T, StoreError>;
