//! Translation between the OpenAI-compatible client schema and Ollama's API
//!
//! [`Translator`] owns the backend configuration and an [`HttpClient`], and
//! implements the two operations the shim exposes: listing models and
//! completing a chat. Each call is a single round trip with no retained state.
use axum::body::Body;
use axum::http::{Method, Request, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::backend::{
    Backend, BackendChatRequest, BackendChatResponse, CHAT_PATH, TAGS_PATH, TagsResponse,
};
use crate::client::HttpClient;
use crate::errors::BackendError;
use crate::models::{ChatCompletionRequest, ChatCompletionResponse, ListModelResponse, Model};

/// Outcome of [`Translator::list_models`].
#[derive(Debug)]
pub enum ModelListing {
    /// The backend answered; one entry per backend model, in backend order.
    Backend(Vec<Model>),
    /// The backend could not be queried; a single entry for the default model.
    Fallback { data: Vec<Model>, reason: BackendError },
}

impl ModelListing {
    pub fn models(&self) -> &[Model] {
        match self {
            ModelListing::Backend(data) | ModelListing::Fallback { data, .. } => data,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ModelListing::Fallback { .. })
    }
}

impl From<ModelListing> for ListModelResponse {
    fn from(listing: ModelListing) -> Self {
        match listing {
            ModelListing::Backend(data) | ModelListing::Fallback { data, .. } => {
                ListModelResponse::new(data)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Translator<T: HttpClient> {
    http_client: T,
    backend: Backend,
}

impl<T: HttpClient + Send + Sync> Translator<T> {
    pub fn new(http_client: T, backend: Backend) -> Self {
        Self {
            http_client,
            backend,
        }
    }

    /// Lists the backend's models. Never fails: any backend error degrades to a
    /// single entry for the configured default model.
    #[instrument(skip(self), fields(backend = %self.backend.base_url))]
    pub async fn list_models(&self) -> ModelListing {
        match self.call::<TagsResponse>(Method::GET, TAGS_PATH, None).await {
            Ok(tags) => {
                debug!("Backend reported {} models", tags.models.len());
                ModelListing::Backend(
                    tags.models
                        .into_iter()
                        .map(|entry| Model::new(entry.name))
                        .collect(),
                )
            }
            Err(reason) => {
                warn!(
                    error = %reason,
                    default_model = %self.backend.default_model,
                    "Model listing failed, falling back to default model"
                );
                ModelListing::Fallback {
                    data: vec![Model::new(self.backend.default_model.clone())],
                    reason,
                }
            }
        }
    }

    /// Forwards a chat to the backend with streaming disabled and wraps the
    /// reply as a chat completion.
    #[instrument(skip(self, request), fields(model = tracing::field::Empty))]
    pub async fn complete_chat(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, BackendError> {
        let model = request
            .model
            .unwrap_or_else(|| self.backend.default_model.clone());
        let messages = request.messages.unwrap_or_default();
        tracing::Span::current().record("model", model.as_str());

        let payload = serde_json::to_vec(&BackendChatRequest {
            model: &model,
            messages: &messages,
            stream: false,
        })
        .map_err(BackendError::Encode)?;

        info!("Forwarding {} messages to backend", messages.len());
        let reply = self
            .call::<BackendChatResponse>(Method::POST, CHAT_PATH, Some(payload))
            .await?;

        Ok(ChatCompletionResponse::from_reply(model, reply.into_content()))
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<R, BackendError> {
        let url = self.backend.endpoint(path);
        let builder = Request::builder().method(method).uri(&url);
        let req = match body {
            Some(bytes) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(bytes))?,
            None => builder.body(Body::empty())?,
        };

        debug!("Sending backend request to {}", url);
        let response = self
            .http_client
            .request(req)
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status { status, url });
        }

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(BackendError::Body)?;
        serde_json::from_slice(&bytes).map_err(BackendError::Decode)
    }
}
