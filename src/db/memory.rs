// src/db/memory.rs
// In-process catalog for tests and database-less runs
//
// Mirrors the MongoDB behaviour the app relies on: implicit collection
// creation on first insert, validator enforcement, generated ObjectIds,
// and sorted full scans. Index definitions are recorded but not used for
// lookups.

use async_trait::async_trait;
use mongodb::bson::{Bson, Document, oid::ObjectId};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{Catalog, DocumentCollection, IndexSpec, validator};
use crate::error::StoreError;

#[derive(Debug, Default)]
struct CollectionState {
    validator: Option<Document>,
    indexes: Vec<IndexSpec>,
    documents: Vec<Document>,
}

/// Shared in-memory database. Clones share the same collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    collections: Arc<RwLock<HashMap<String, CollectionState>>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of existing collections, sorted
    pub async fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn validator(&self, name: &str) -> Option<Document> {
        self.collections
            .read()
            .await
            .get(name)
            .and_then(|state| state.validator.clone())
    }

    pub async fn indexes(&self, name: &str) -> Vec<IndexSpec> {
        self.collections
            .read()
            .await
            .get(name)
            .map(|state| state.indexes.clone())
            .unwrap_or_default()
    }

    /// Number of documents stored in `name`
    pub async fn count(&self, name: &str) -> usize {
        self.collections
            .read()
            .await
            .get(name)
            .map_or(0, |state| state.documents.len())
    }

    /// Typed handle, for callers that need more than the trait object
    pub fn memory_collection(&self, name: &str) -> MemoryCollection {
        MemoryCollection {
            catalog: self.clone(),
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn drop_collection(&self, name: &str) -> Result<(), StoreError> {
        self.collections.write().await.remove(name);
        Ok(())
    }

    async fn create_collection(&self, name: &str, validator: Document) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        if collections.contains_key(name) {
            return Err(StoreError::Backend(format!(
                "collection `{}` already exists",
                name
            )));
        }
        collections.insert(
            name.to_string(),
            CollectionState {
                validator: Some(validator),
                ..Default::default()
            },
        );
        Ok(())
    }

    async fn create_index(&self, collection: &str, index: IndexSpec) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let state = collections.entry(collection.to_string()).or_default();

        match state.indexes.iter().find(|existing| existing.name == index.name) {
            Some(existing) if *existing == index => Ok(()),
            Some(_) => Err(StoreError::Backend(format!(
                "index `{}` already exists with different options",
                index.name
            ))),
            None => {
                state.indexes.push(index);
                Ok(())
            }
        }
    }

    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
        Arc::new(self.memory_collection(name))
    }
}

/// Collection handle resolved by name on every call
#[derive(Debug, Clone)]
pub struct MemoryCollection {
    catalog: MemoryCatalog,
    name: String,
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn insert_one(&self, mut document: Document) -> Result<String, StoreError> {
        let mut collections = self.catalog.collections.write().await;
        let state = collections.entry(self.name.clone()).or_default();

        if let Some(schema) = &state.validator {
            validator::validate(schema, &document)?;
        }

        let id = match document.get("_id") {
            Some(Bson::ObjectId(oid)) => oid.to_hex(),
            Some(other) => other.to_string(),
            None => {
                let oid = ObjectId::new();
                document.insert("_id", oid);
                oid.to_hex()
            }
        };

        state.documents.push(document);
        Ok(id)
    }

    async fn find_all_sorted(
        &self,
        sort_key: &str,
        descending: bool,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.catalog.collections.read().await;
        let mut documents = collections
            .get(&self.name)
            .map(|state| state.documents.clone())
            .unwrap_or_default();

        // Ties keep insertion order ascending and the reverse descending
        if descending {
            documents.reverse();
            documents.sort_by(|a, b| compare_values(b.get(sort_key), a.get(sort_key)));
        } else {
            documents.sort_by(|a, b| compare_values(a.get(sort_key), b.get(sort_key)));
        }
        Ok(documents)
    }
}

/// Missing sorts before present; mismatched types compare equal
fn compare_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a, b) {
            (Bson::DateTime(x), Bson::DateTime(y)) => x.cmp(y),
            (Bson::String(x), Bson::String(y)) => x.cmp(y),
            (Bson::ObjectId(x), Bson::ObjectId(y)) => x.cmp(y),
            _ => match (as_number(a), as_number(b)) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            },
        },
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(v) => Some(*v),
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        _ => None,
    }
}
