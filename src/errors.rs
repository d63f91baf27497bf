//! Error types for backend calls and the client-facing error envelope
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Everything that can go wrong while talking to the backend.
///
/// Model listing recovers from all of these; chat completion surfaces them to
/// the client as a server error.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to build backend request: {0}")]
    Request(#[from] axum::http::Error),
    #[error("failed to encode backend request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("backend unreachable: {0}")]
    Transport(String),
    #[error("backend returned {status} for url: {url}")]
    Status { status: StatusCode, url: String },
    #[error("failed to read backend response: {0}")]
    Body(#[source] axum::Error),
    #[error("malformed backend response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// A chat completion failure, returned to clients as
/// `500 {"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    message: String,
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// An unparseable chat request body.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.message })),
        )
            .into_response()
    }
}
