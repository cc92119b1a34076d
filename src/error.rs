// src/error.rs
// Error taxonomy for calculations and the stores behind them

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Which form field failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    First,
    Second,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Name of the form field this refers to
    pub fn form_name(&self) -> &'static str {
        match self {
            Field::First => "number1",
            Field::Second => "number2",
        }
    }
}

/// Failures from a document store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The document was rejected by the collection's schema validator
    #[error("document failed validation: {0}")]
    Validation(String),

    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: &'static str, seconds: u64 },

    #[error("database error: {0}")]
    Backend(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        crate::db::mongo::classify_error(err)
    }
}

impl From<mongodb::bson::ser::Error> for StoreError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        StoreError::Backend(format!("encode failed: {}", err))
    }
}

impl From<mongodb::bson::de::Error> for StoreError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        StoreError::Backend(format!("decode failed: {}", err))
    }
}

/// Errors surfaced by a calculation request
#[derive(Error, Debug)]
pub enum CalcError {
    #[error("invalid format for {} number", .0.as_str())]
    InvalidNumberFormat(Field),

    #[error("division by zero")]
    DivisionByZero,

    #[error("failed to save result: {0}")]
    Store(#[from] StoreError),

    #[error("failed to load results: {0}")]
    Query(StoreError),
}

/// Convenience type alias for Result using CalcError
pub type Result<T> = std::result::Result<T, CalcError>;

impl CalcError {
    /// Client errors are never retried and never reach the store
    pub fn is_client_error(&self) -> bool {
        matches!(self, CalcError::InvalidNumberFormat(_) | CalcError::DivisionByZero)
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for CalcError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_first_number_message() {
        let err = CalcError::InvalidNumberFormat(Field::First);
        assert_eq!(err.to_string(), "invalid format for first number");
    }

    #[test]
    fn test_invalid_second_number_message() {
        let err = CalcError::InvalidNumberFormat(Field::Second);
        assert_eq!(err.to_string(), "invalid format for second number");
    }

    #[test]
    fn test_field_form_names() {
        assert_eq!(Field::First.form_name(), "number1");
        assert_eq!(Field::Second.form_name(), "number2");
    }

    #[test]
    fn test_client_errors_are_bad_request() {
        assert_eq!(
            CalcError::DivisionByZero.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CalcError::InvalidNumberFormat(Field::Second).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_store_errors_are_server_errors() {
        let err: CalcError = StoreError::Backend("connection refused".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("failed to save result"));
        assert!(err.to_string().contains("connection refused"));

        // A validator rejection at the store is still the server's fault
        let err = CalcError::Store(StoreError::Validation("missing `result`".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_query_error_message() {
        let err = CalcError::Query(StoreError::Timeout {
            operation: "find",
            seconds: 10,
        });
        assert_eq!(err.to_string(), "failed to load results: find timed out after 10s");
    }

    #[test]
    fn test_into_response_status() {
        let response = CalcError::DivisionByZero.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = CalcError::Store(StoreError::Backend("down".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
