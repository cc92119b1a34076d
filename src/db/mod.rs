// src/db/mod.rs
// Document storage: collection/catalog traits, backends, typed stores and schema setup

pub mod memory;
pub mod mongo;
pub mod schema;
mod stores;
pub mod validator;

use async_trait::async_trait;
use mongodb::bson::Document;
use std::sync::Arc;

use crate::error::StoreError;

pub use memory::{MemoryCatalog, MemoryCollection};
pub use mongo::{MongoCatalog, MongoCollection, Timeouts};
pub use schema::apply_migrations;
pub use stores::{LogStore, ResultStore};

/// A named collection of BSON documents
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    fn name(&self) -> &str;

    /// Insert one document and return its generated id
    async fn insert_one(&self, document: Document) -> Result<String, StoreError>;

    /// Every document in the collection ordered by `sort_key`
    async fn find_all_sorted(
        &self,
        sort_key: &str,
        descending: bool,
    ) -> Result<Vec<Document>, StoreError>;
}

/// Secondary index definition
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSpec {
    pub name: String,
    /// Ordered key document, e.g. `{ operation: 1, created_at: -1 }`
    pub keys: Document,
    /// Enforced by MongoDB only; the in-memory catalog just records it
    pub unique: bool,
}

/// A database of collections, as seen by schema setup
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Drop a collection. Dropping a missing collection is not an error.
    async fn drop_collection(&self, name: &str) -> Result<(), StoreError>;

    /// Create a collection guarded by `validator`
    async fn create_collection(&self, name: &str, validator: Document) -> Result<(), StoreError>;

    async fn create_index(&self, collection: &str, index: IndexSpec) -> Result<(), StoreError>;

    /// Handle to a collection by name. The handle stays valid across drops.
    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection>;
}
