//! HTTP error responses.
//!
//! Every error renders as `{"detail": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quiz_domain::DomainError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Request body is not JSON
    #[error("Invalid JSON")]
    InvalidJson,

    /// `email`, `secret` or `url` absent or empty
    #[error("Missing fields")]
    MissingFields,

    #[error("Run not found")]
    RunNotFound,

    #[error("{0}")]
    BadRequest(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MissingFields => AppError::MissingFields,
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidJson | AppError::MissingFields | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::RunNotFound => StatusCode::NOT_FOUND,
        };
        tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
