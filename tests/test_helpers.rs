// tests/test_helpers.rs
// Shared setup for HTTP integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use mongodb::bson::Document;
use std::sync::Arc;
use tower::ServiceExt;

use calcbook::{
    StoreError,
    db::{DocumentCollection, LogStore, MemoryCatalog, ResultStore, apply_migrations},
    pipeline::Calculator,
    web::{create_router, state::AppState},
};

/// In-memory catalog with validators and indexes installed
pub async fn migrated_catalog() -> MemoryCatalog {
    let catalog = MemoryCatalog::new();
    apply_migrations(&catalog)
        .await
        .expect("apply migrations to in-memory catalog");
    catalog
}

/// Router backed by `catalog`
pub fn app(catalog: &MemoryCatalog) -> Router {
    create_router(AppState::from_catalog(catalog))
}

/// Router with explicitly chosen collections, for failure injection
pub fn app_with(
    results: Arc<dyn DocumentCollection>,
    logs: Arc<dyn DocumentCollection>,
) -> Router {
    let calculator = Calculator::new(ResultStore::new(results), LogStore::new(logs));
    create_router(AppState::new(calculator))
}

/// POST an urlencoded form
pub async fn post_form(app: &Router, path: &str, body: &str) -> Response<Body> {
    post_form_with(app, path, body, &[]).await
}

pub async fn post_form_with(
    app: &Router,
    path: &str,
    body: &str,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// POST with no `Content-Type` header
pub async fn post_bare(app: &Router, path: &str, body: &str, json: bool) -> Response<Body> {
    let mut builder = Request::builder().method("POST").uri(path);
    if json {
        builder = builder.header(header::ACCEPT, "application/json");
    }

    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// GET a path, optionally asking for JSON
pub async fn get(app: &Router, path: &str, json: bool) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if json {
        builder = builder.header(header::ACCEPT, "application/json");
    }

    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collection whose every call fails like an unreachable server
pub struct BrokenCollection;

#[async_trait]
impl DocumentCollection for BrokenCollection {
    fn name(&self) -> &str {
        "broken"
    }

    async fn insert_one(&self, _document: Document) -> Result<String, StoreError> {
        Err(StoreError::Backend("server selection timeout".to_string()))
    }

    async fn find_all_sorted(
        &self,
        _sort_key: &str,
        _descending: bool,
    ) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Timeout {
            operation: "find",
            seconds: 10,
        })
    }
}
