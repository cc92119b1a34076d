// src/db/schema.rs
// One-shot schema setup: collection validators and secondary indexes

use mongodb::bson::{Document, doc};
use tracing::info;

use super::{Catalog, IndexSpec};
use crate::error::StoreError;
use crate::models::{LOGS_COLLECTION, RESULTS_COLLECTION};

/// Validator for the `results` collection
pub fn results_validator() -> Document {
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": ["number1", "number2", "result", "operation", "created_at"],
            "properties": {
                "number1": { "bsonType": "double" },
                "number2": { "bsonType": "double" },
                "result": { "bsonType": "double" },
                "operation": { "bsonType": "string" },
                "created_at": {
                    "bsonType": "date",
                    "description": "timestamp of result creation"
                }
            }
        }
    }
}

/// Validator for the `logs` collection
pub fn logs_validator() -> Document {
    doc! {
        "$jsonSchema": {
            "bsonType": "object",
            "required": ["operation", "input", "result", "user_ip", "timestamp"],
            "properties": {
                "operation": { "bsonType": "string" },
                "input": { "bsonType": "string" },
                "result": { "bsonType": "string" },
                "user_ip": { "bsonType": "string" },
                "timestamp": {
                    "bsonType": "date",
                    "description": "timestamp of the log entry"
                }
            }
        }
    }
}

pub fn results_index() -> IndexSpec {
    IndexSpec {
        name: "operation_created_at".to_string(),
        keys: doc! { "operation": 1, "created_at": -1 },
        unique: false,
    }
}

pub fn logs_index() -> IndexSpec {
    IndexSpec {
        name: "operation_timestamp".to_string(),
        keys: doc! { "operation": 1, "timestamp": -1 },
        unique: false,
    }
}

/// Drop and recreate both collections with their validators and indexes.
///
/// Destroys existing data. Meant for environment bootstrap and test setup,
/// never for the request path.
pub async fn apply_migrations(catalog: &dyn Catalog) -> Result<(), StoreError> {
    let plan = [
        (RESULTS_COLLECTION, results_validator(), results_index()),
        (LOGS_COLLECTION, logs_validator(), logs_index()),
    ];

    for (name, validator, index) in plan {
        catalog.drop_collection(name).await?;
        catalog.create_collection(name, validator).await?;

        let index_name = index.name.clone();
        catalog.create_index(name, index).await?;
        info!("Collection '{}' ready (index '{}')", name, index_name);
    }

    Ok(())
}
