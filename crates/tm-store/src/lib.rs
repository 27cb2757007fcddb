//! tm-store - Document store abstraction for Tidemark
//!
//! This crate provides the `DocumentStore` trait consumed by the migration
//! and seed runners, and `MemoryStore`, an embedded implementation that can
//! persist itself to a JSON snapshot file.

pub mod document;
pub mod error;
pub mod memory;
pub mod traits;

pub use document::{Document, Filter, IndexSpec};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use traits::DocumentStore;

pub use tm_core::MEMORY_STORE;
