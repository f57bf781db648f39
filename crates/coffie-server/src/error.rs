//! Error types for the session API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Data
//! layer and lottery errors map onto distinct statuses so clients can
//! tell a conflict from a missing actor from an empty session.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use coffie_core::SelectionError;
use coffie_db::DbError;

/// Errors that can occur in the session API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was missing a field or carried a malformed one.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The referenced actor does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request collides with existing state (e.g. a taken name).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The operation cannot run in the current state (e.g. nobody present).
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// The roster page failed to render.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::DuplicateName(_) => Self::Conflict(err.to_string()),
            DbError::ActorNotFound(_) => Self::NotFound(err.to_string()),
            DbError::InvalidName(_) => Self::BadRequest(err.to_string()),
            DbError::Sqlite(_) | DbError::Migration(_) | DbError::Config(_) => {
                tracing::error!(error = %err, "Database failure");
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<SelectionError> for ApiError {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::EmptyRoster => Self::PreconditionFailed(err.to_string()),
            SelectionError::ZeroTrials => Self::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Self::PreconditionFailed(msg) => (StatusCode::PRECONDITION_FAILED, msg.clone()),
            Self::Template(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("template error: {e}"),
            ),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
