//! Axum handlers for the shim
use crate::AppState;
use crate::client::HttpClient;
use crate::errors::ApiError;
use crate::models::{ChatCompletionRequest, ChatCompletionResponse, ListModelResponse};
use axum::{Json, body::Bytes, extract::State};
use tracing::{debug, error, instrument};

/// Lists the backend's models. Always answers 200; a failed backend call
/// yields the default model only.
#[instrument(skip(state))]
pub async fn models<T: HttpClient + Send + Sync>(
    State(state): State<AppState<T>>,
) -> Json<ListModelResponse> {
    let listing = state.translator.list_models().await;
    debug!(
        fallback = listing.is_fallback(),
        "Listing {} models",
        listing.models().len()
    );
    Json(listing.into())
}

/// Translates a chat completion request into a backend chat call.
///
/// The body is parsed by hand rather than with the `Json` extractor so that
/// clients which omit the content-type header are still served.
#[instrument(skip(state, body))]
pub async fn chat_completions<T: HttpClient + Send + Sync>(
    State(state): State<AppState<T>>,
    body: Bytes,
) -> Result<Json<ChatCompletionResponse>, ApiError> {
    let request: ChatCompletionRequest = serde_json::from_slice(&body).map_err(|e| {
        error!("Failed to parse chat request: {}", e);
        ApiError::from(e)
    })?;

    match state.translator.complete_chat(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            error!("Chat completion failed: {}", e);
            Err(e.into())
        }
    }
}
