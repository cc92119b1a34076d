// src/models.rs
// Persisted documents: calculation results and the audit log

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::arithmetic::{Operation, format_number};

pub const RESULTS_COLLECTION: &str = "results";
pub const LOGS_COLLECTION: &str = "logs";

/// Outcome of one arithmetic operation.
///
/// `operation` is kept as the stored name: the collection validator only
/// requires a string, so documents written outside the app may carry names
/// this build does not know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub number1: f64,
    pub number2: f64,
    pub result: f64,
    pub operation: String,
    pub created_at: DateTime,
}

impl ResultRecord {
    pub fn new(operation: Operation, number1: f64, number2: f64, result: f64) -> Self {
        Self::at(operation, number1, number2, result, DateTime::now())
    }

    pub fn at(
        operation: Operation,
        number1: f64,
        number2: f64,
        result: f64,
        created_at: DateTime,
    ) -> Self {
        Self {
            id: None,
            number1,
            number2,
            result,
            operation: operation.as_str().to_string(),
            created_at,
        }
    }

    /// The operation, if its name is one this build supports
    pub fn kind(&self) -> Option<Operation> {
        self.operation.parse().ok()
    }

    /// Invocation text for the audit log, e.g. `10.0 * 5.0`
    pub fn describe(&self) -> String {
        match self.kind() {
            Some(operation) => operation.describe(self.number1, self.number2),
            None => format!(
                "{}({}, {})",
                self.operation,
                format_number(self.number1),
                format_number(self.number2)
            ),
        }
    }
}

/// Audit record of one invocation, loosely tied to a [`ResultRecord`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub operation: String,
    pub input: String,
    pub result: String,
    pub user_ip: String,
    pub timestamp: DateTime,
}

impl LogEntry {
    /// Build the audit entry for a stored result
    pub fn for_result(record: &ResultRecord, user_ip: impl Into<String>) -> Self {
        Self {
            id: None,
            operation: record.operation.clone(),
            input: record.describe(),
            result: format_number(record.result),
            user_ip: user_ip.into(),
            timestamp: DateTime::now(),
        }
    }
}

/// JSON/HTML friendly view of a [`ResultRecord`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultView {
    pub id: Option<String>,
    pub number1: f64,
    pub number2: f64,
    pub result: f64,
    pub operation: String,
    pub created_at: String,
}

impl From<&ResultRecord> for ResultView {
    fn from(record: &ResultRecord) -> Self {
        let created_at = record
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_else(|_| record.created_at.timestamp_millis().to_string());

        Self {
            id: record.id.map(|id| id.to_hex()),
            number1: record.number1,
            number2: record.number2,
            result: record.result,
            operation: record.operation.clone(),
            created_at,
        }
    }
}

/// Body of `GET /` when JSON is requested
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsResponse {
    pub results: Vec<ResultView>,
}
