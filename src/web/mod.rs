// src/web/mod.rs
// Web server layer

pub mod api;
pub mod extract;
pub mod state;
pub mod views;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::web::state::AppState;

/// Create the web server router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health))
        .route("/add", post(api::add))
        .route("/subtract", post(api::subtract))
        .route("/multiply", post(api::multiply))
        .route("/divide", post(api::divide))
        .route("/square", post(api::square))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
