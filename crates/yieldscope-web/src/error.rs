//! Error types for the dashboard API server.
//!
//! [`ApiError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use yieldscope_data::DataError;
use yieldscope_figures::FigureError;

/// Errors that can occur in the dashboard API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An invalid query parameter was provided.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),

    /// A session ID could not be parsed from the request path.
    #[error("invalid session id: {0}")]
    InvalidSessionId(String),

    /// A figure or map document could not be built.
    #[error("figure error: {0}")]
    Figure(#[from] FigureError),

    /// A dataset operation failed (export, for instance).
    #[error("data error: {0}")]
    Data(#[from] DataError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Serialization(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("JSON error: {e}"))
            }
            Self::InvalidQuery(msg) | Self::InvalidSessionId(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            Self::Figure(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            Self::Data(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
