// src/pipeline.rs
// Parse -> compute -> persist -> audit, for one calculation request
//
// Two writes with independent failure modes:
// 1. the result write, whose failure fails the request;
// 2. the audit write, whose failure is recorded and reported but never
//    undoes step 1.

use tracing::{debug, warn};

use crate::arithmetic::Operation;
use crate::db::{LogStore, ResultStore};
use crate::error::Result;
use crate::input::{CalcForm, parse_operands};
use crate::models::{LogEntry, ResultRecord};

/// What happened to the audit write
#[derive(Debug, Clone, PartialEq)]
pub enum AuditOutcome {
    Logged { id: String },
    Failed { reason: String },
}

impl AuditOutcome {
    pub fn is_logged(&self) -> bool {
        matches!(self, AuditOutcome::Logged { .. })
    }
}

/// A successfully stored calculation
#[derive(Debug, Clone)]
pub struct Recorded {
    pub result_id: String,
    pub record: ResultRecord,
    pub audit: AuditOutcome,
}

#[derive(Clone)]
pub struct Calculator {
    results: ResultStore,
    logs: LogStore,
}

impl Calculator {
    pub fn new(results: ResultStore, logs: LogStore) -> Self {
        Self { results, logs }
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    /// Run `operation` on a submitted form. Parse and compute failures return
    /// before anything is written.
    pub async fn submit(
        &self,
        operation: Operation,
        form: &CalcForm,
        client_ip: &str,
    ) -> Result<Recorded> {
        let operands = parse_operands(form, operation)?;
        let value = operation.evaluate(operands.a, operands.b)?;

        let mut record = ResultRecord::new(operation, operands.a, operands.b, value);
        let result_id = self.results.insert(&record).await?;
        record.id = mongodb::bson::oid::ObjectId::parse_str(&result_id).ok();
        debug!("Stored {} result {}", operation.as_str(), result_id);

        let audit = self.audit(&record, client_ip).await;

        Ok(Recorded {
            result_id,
            record,
            audit,
        })
    }

    /// Best-effort audit write
    async fn audit(&self, record: &ResultRecord, client_ip: &str) -> AuditOutcome {
        let entry = LogEntry::for_result(record, client_ip);
        match self.logs.insert(&entry).await {
            Ok(id) => AuditOutcome::Logged { id },
            Err(e) => {
                warn!(
                    "Failed to log {} operation from {}: {}",
                    entry.operation, entry.user_ip, e
                );
                AuditOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
