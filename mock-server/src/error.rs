use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::models::ValidationIssue;

/// A rejected request. Every variant renders as `{"detail": ...}`.
#[derive(Debug, Error)]
pub enum ApiFailure {
    #[error("Not authenticated")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    /// Tier ceiling reached.
    #[error("{0}")]
    QuotaExceeded(String),

    #[error("{0}")]
    NotFound(String),

    /// The quest already has a completion for today.
    #[error("{0}")]
    AlreadyCompleted(String),

    #[error("validation failed ({} issues)", .0.len())]
    Validation(Vec<ValidationIssue>),
}

impl ApiFailure {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiFailure::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiFailure::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiFailure::QuotaExceeded(_) => StatusCode::FORBIDDEN,
            ApiFailure::NotFound(_) => StatusCode::NOT_FOUND,
            ApiFailure::AlreadyCompleted(_) => StatusCode::CONFLICT,
            ApiFailure::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiFailure::Validation(issues) => json!({ "detail": issues }),
            other => json!({ "detail": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
