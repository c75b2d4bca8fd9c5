//! Error types for the RivalQuest API client.
//!
//! # Design
//! Callers branch on the variant, never on raw status codes. Quota
//! rejections (403) and validation failures (422) are both non-2xx but lead
//! to different UI behavior (upgrade prompt vs. field error), so each gets a
//! dedicated variant. `AlreadyCompleted` is kept apart from `QuotaExceeded`
//! even though both come from `complete_today`. Every other non-2xx lands in
//! `HttpError` with the raw status and body.

use thiserror::Error;

use crate::types::ValidationIssue;

/// Errors returned by `RivalQuestClient` and `ApiClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The request was structurally invalid (422, or a malformed path
    /// parameter caught before sending).
    #[error("validation failed: {}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),

    /// A tier ceiling was hit: daily completions or rival slots (403).
    #[error("quota exceeded: {reason}")]
    QuotaExceeded { reason: String },

    /// The quest already has a completion for today.
    #[error("already completed: {reason}")]
    AlreadyCompleted { reason: String },

    /// The server returned 404.
    #[error("not found: {reason}")]
    NotFound { reason: String },

    /// The server returned 401.
    #[error("not authenticated")]
    Unauthorized,

    /// Any other non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// Whether the UI should answer this failure with an upgrade offer.
    pub fn is_upgrade_prompt(&self) -> bool {
        matches!(self, ApiError::QuotaExceeded { .. })
    }

    /// Field-level violations, if this is a validation failure.
    pub fn validation_issues(&self) -> &[ValidationIssue] {
        match self {
            ApiError::Validation(issues) => issues,
            _ => &[],
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
