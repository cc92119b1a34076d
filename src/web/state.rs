// src/web/state.rs
// Web server state, built once at startup and shared by every handler

use crate::db::{Catalog, LogStore, ResultStore};
use crate::models::{LOGS_COLLECTION, RESULTS_COLLECTION};
use crate::pipeline::Calculator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub calculator: Calculator,
}

impl AppState {
    pub fn new(calculator: Calculator) -> Self {
        Self { calculator }
    }

    /// Wire both stores to their collections in `catalog`
    pub fn from_catalog(catalog: &dyn Catalog) -> Self {
        let results = ResultStore::new(catalog.collection(RESULTS_COLLECTION));
        let logs = LogStore::new(catalog.collection(LOGS_COLLECTION));
        Self::new(Calculator::new(results, logs))
    }
}
