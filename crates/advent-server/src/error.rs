//! Error types for the game API layer.
//!
//! [`ServerError`] unifies all failure modes into a single enum that
//! converts into an HTTP response via its `IntoResponse`
//! implementation. Validation failures reject the request with no
//! state mutation; a finished game answers further commands with a
//! conflict.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The request failed validation (empty command, empty name, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The request conflicts with the session's state (game over).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A save file was missing or unreadable.
    #[error("persistence error: {0}")]
    Persistence(#[from] crate::persistence::PersistenceError),

    /// A serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Self::Persistence(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            Self::Serialization(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("JSON error: {e}"))
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
