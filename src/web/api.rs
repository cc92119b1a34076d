// src/web/api.rs
// HTTP handlers: history listing and one endpoint per operation

use axum::{
    Json,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::info;

use super::extract::{ClientIp, Format, Submitted};
use super::views::render_index;
use crate::arithmetic::Operation;
use crate::error::CalcError;
use crate::input::CalcForm;
use crate::models::{ResultView, ResultsResponse};
use crate::web::state::AppState;

/// A [`CalcError`] rendered in the format the client asked for
pub struct WebError {
    error: CalcError,
    format: Format,
}

impl WebError {
    pub fn new(error: CalcError, format: Format) -> Self {
        Self { error, format }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self.format {
            Format::Json => self.error.into_response(),
            Format::Html => {
                let status = self.error.status_code();
                if status.is_server_error() {
                    tracing::error!("{}", self.error);
                }
                (status, Html(render_index(&[], Some(&self.error.to_string())))).into_response()
            }
        }
    }
}

// ═══════════════════════════════════════
// HEALTH & HISTORY
// ═══════════════════════════════════════

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `GET /`: every stored result, newest first
pub async fn index(State(state): State<AppState>, format: Format) -> Result<Response, WebError> {
    let records = state
        .calculator
        .results()
        .list_all()
        .await
        .map_err(|e| WebError::new(CalcError::Query(e), format))?;

    let results: Vec<ResultView> = records.iter().map(ResultView::from).collect();
    let response = match format {
        Format::Json => Json(ResultsResponse { results }).into_response(),
        Format::Html => Html(render_index(&results, None)).into_response(),
    };
    Ok(response)
}

// ═══════════════════════════════════════
// OPERATIONS
// ═══════════════════════════════════════

async fn calculate(
    state: &AppState,
    operation: Operation,
    client_ip: &str,
    format: Format,
    form: &CalcForm,
) -> Result<Redirect, WebError> {
    let recorded = state
        .calculator
        .submit(operation, form, client_ip)
        .await
        .map_err(|e| WebError::new(e, format))?;

    info!(
        "{} = {} (result {}, audit logged: {})",
        recorded.record.describe(),
        recorded.record.result,
        recorded.result_id,
        recorded.audit.is_logged()
    );
    Ok(Redirect::to("/"))
}

pub async fn add(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    format: Format,
    Submitted(form): Submitted,
) -> Result<Redirect, WebError> {
    calculate(&state, Operation::Add, &ip, format, &form).await
}

pub async fn subtract(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    format: Format,
    Submitted(form): Submitted,
) -> Result<Redirect, WebError> {
    calculate(&state, Operation::Subtract, &ip, format, &form).await
}

pub async fn multiply(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    format: Format,
    Submitted(form): Submitted,
) -> Result<Redirect, WebError> {
    calculate(&state, Operation::Multiply, &ip, format, &form).await
}

pub async fn divide(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    format: Format,
    Submitted(form): Submitted,
) -> Result<Redirect, WebError> {
    calculate(&state, Operation::Divide, &ip, format, &form).await
}

pub async fn square(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    format: Format,
    Submitted(form): Submitted,
) -> Result<Redirect, WebError> {
    calculate(&state, Operation::Square, &ip, format, &form).await
}
