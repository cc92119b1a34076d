// src/db/stores.rs
// Typed stores for results and audit log entries

use mongodb::bson::{from_document, to_document};
use std::sync::Arc;

use super::DocumentCollection;
use crate::error::StoreError;
use crate::models::{LogEntry, ResultRecord};

/// Persistence for [`ResultRecord`]s
#[derive(Clone)]
pub struct ResultStore {
    collection: Arc<dyn DocumentCollection>,
}

impl ResultStore {
    pub fn new(collection: Arc<dyn DocumentCollection>) -> Self {
        Self { collection }
    }

    /// Write one record, returning the generated id
    pub async fn insert(&self, record: &ResultRecord) -> Result<String, StoreError> {
        let document = to_document(record)?;
        self.collection.insert_one(document).await
    }

    /// Every stored record, newest first
    pub async fn list_all(&self) -> Result<Vec<ResultRecord>, StoreError> {
        self.collection
            .find_all_sorted("created_at", true)
            .await?
            .into_iter()
            .map(|document| from_document(document).map_err(StoreError::from))
            .collect()
    }
}

/// Persistence for [`LogEntry`]s
#[derive(Clone)]
pub struct LogStore {
    collection: Arc<dyn DocumentCollection>,
}

impl LogStore {
    pub fn new(collection: Arc<dyn DocumentCollection>) -> Self {
        Self { collection }
    }

    pub async fn insert(&self, entry: &LogEntry) -> Result<String, StoreError> {
        let document = to_document(entry)?;
        self.collection.insert_one(document).await
    }

    /// Every entry, newest first
    pub async fn list_all(&self) -> Result<Vec<LogEntry>, StoreError> {
        self.collection
            .find_all_sorted("timestamp", true)
            .await?
            .into_iter()
            .map(|document| from_document(document).map_err(StoreError::from))
            .collect()
    }
}
