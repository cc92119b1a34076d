// src/db/mongo.rs
// MongoDB backend: connection setup and timeout-bounded collection access

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{Bson, Document, doc},
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions},
};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::{Catalog, DocumentCollection, IndexSpec};
use crate::error::StoreError;

/// Server error code for a write rejected by a collection validator
pub const DOCUMENT_VALIDATION_FAILURE: i32 = 121;

/// Server error code for an operation on a collection that does not exist
pub const NAMESPACE_NOT_FOUND: i32 = 26;

/// Upper bounds for single store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub insert: Duration,
    pub query: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            insert: Duration::from_secs(5),
            query: Duration::from_secs(10),
        }
    }
}

/// Connect to MongoDB and verify the server answers a ping
pub async fn connect(uri: &str, db_name: &str, connect_timeout: Duration) -> Result<Database> {
    let mut options = ClientOptions::parse(uri)
        .await
        .context("Invalid MongoDB connection string")?;
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    options.connect_timeout = Some(connect_timeout);
    options.server_selection_timeout = Some(connect_timeout);

    let client = Client::with_options(options).context("Failed to create MongoDB client")?;
    let database = client.database(db_name);

    tokio::time::timeout(connect_timeout, database.run_command(doc! { "ping": 1 }))
        .await
        .map_err(|_| {
            anyhow::anyhow!(
                "MongoDB ping timed out after {}s",
                connect_timeout.as_secs()
            )
        })?
        .context("Failed to connect to MongoDB")?;

    info!("Connected to MongoDB database '{}'", db_name);
    Ok(database)
}

/// Map a driver error onto the store taxonomy
pub(crate) fn classify_error(err: mongodb::error::Error) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DOCUMENT_VALIDATION_FAILURE =>
        {
            StoreError::Validation(write_error.message.clone())
        }
        ErrorKind::Command(command_error) if command_error.code == DOCUMENT_VALIDATION_FAILURE => {
            StoreError::Validation(command_error.message.clone())
        }
        _ => StoreError::Backend(err.to_string()),
    }
}

fn is_namespace_not_found(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Command(command_error) if command_error.code == NAMESPACE_NOT_FOUND
    )
}

async fn bounded<T, F>(operation: &'static str, limit: Duration, action: F) -> Result<T, StoreError>
where
    F: IntoFuture<Output = mongodb::error::Result<T>>,
{
    match tokio::time::timeout(limit, action).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => Err(StoreError::Timeout {
            operation,
            seconds: limit.as_secs(),
        }),
    }
}

fn inserted_id_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Collection handle with per-operation timeouts
#[derive(Clone)]
pub struct MongoCollection {
    inner: Collection<Document>,
    timeouts: Timeouts,
}

impl MongoCollection {
    pub fn new(inner: Collection<Document>, timeouts: Timeouts) -> Self {
        Self { inner, timeouts }
    }
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn insert_one(&self, document: Document) -> Result<String, StoreError> {
        let inserted = bounded("insert", self.timeouts.insert, self.inner.insert_one(document)).await?;
        Ok(inserted_id_string(&inserted.inserted_id))
    }

    async fn find_all_sorted(
        &self,
        sort_key: &str,
        descending: bool,
    ) -> Result<Vec<Document>, StoreError> {
        let mut sort = Document::new();
        sort.insert(sort_key, if descending { -1 } else { 1 });

        let query = async {
            let cursor = self.inner.find(Document::new()).sort(sort).await?;
            cursor.try_collect::<Vec<Document>>().await
        };
        bounded("find", self.timeouts.query, query).await
    }
}

/// Database handle used for schema setup and to hand out collections
#[derive(Clone)]
pub struct MongoCatalog {
    database: Database,
    timeouts: Timeouts,
}

impl MongoCatalog {
    pub fn new(database: Database, timeouts: Timeouts) -> Self {
        Self { database, timeouts }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

#[async_trait]
impl Catalog for MongoCatalog {
    async fn drop_collection(&self, name: &str) -> Result<(), StoreError> {
        let collection = self.database.collection::<Document>(name);
        match tokio::time::timeout(self.timeouts.query, collection.drop()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) if is_namespace_not_found(&err) => {
                debug!("Collection '{}' did not exist", name);
                Ok(())
            }
            Ok(Err(err)) => Err(err.into()),
            Err(_) => Err(StoreError::Timeout {
                operation: "drop",
                seconds: self.timeouts.query.as_secs(),
            }),
        }
    }

    async fn create_collection(&self, name: &str, validator: Document) -> Result<(), StoreError> {
        bounded(
            "create collection",
            self.timeouts.query,
            self.database.create_collection(name).validator(validator),
        )
        .await
    }

    async fn create_index(&self, collection: &str, index: IndexSpec) -> Result<(), StoreError> {
        let model = IndexModel::builder()
            .keys(index.keys)
            .options(
                IndexOptions::builder()
                    .name(index.name)
                    .unique(index.unique)
                    .build(),
            )
            .build();

        bounded(
            "create index",
            self.timeouts.query,
            self.database.collection::<Document>(collection).create_index(model),
        )
        .await
        .map(|_| ())
    }

    fn collection(&self, name: &str) -> Arc<dyn DocumentCollection> {
        Arc::new(MongoCollection::new(
            self.database.collection::<Document>(name),
            self.timeouts,
        ))
    }
}
