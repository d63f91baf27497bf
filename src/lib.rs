//! ollama-shim - An OpenAI-compatible front door for Ollama
//!
//! This library translates OpenAI-style model listing and chat completion
//! requests into calls against Ollama's native API, and translates the replies
//! back into the shape OpenAI clients expect.

use axum::Router;
use axum::routing::{get, post};
use axum_prometheus::{
    GenericMetricLayer, Handle, PrometheusMetricLayerBuilder,
    metrics_exporter_prometheus::PrometheusHandle,
};
use std::borrow::Cow;
use tracing::{info, instrument};

pub mod backend;
pub mod client;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod translator;

use backend::Backend;
use client::{HttpClient, HyperClient, PoolSettings};
use handlers::{chat_completions, models as models_handler};
use translator::Translator;

/// The main application state: a translator bound to one backend
#[derive(Clone, Debug)]
pub struct AppState<T: HttpClient> {
    pub translator: Translator<T>,
}

impl AppState<HyperClient> {
    /// Create a new AppState with the default Hyper client
    pub fn new(backend: Backend, pool: PoolSettings) -> Self {
        Self::with_client(backend, client::create_hyper_client(pool))
    }
}

impl<T: HttpClient + Send + Sync> AppState<T> {
    /// Create a new AppState with a custom HTTP client (useful for testing)
    pub fn with_client(backend: Backend, http_client: T) -> Self {
        Self {
            translator: Translator::new(http_client, backend),
        }
    }
}

/// Build the main router for the shim
/// This creates routes for:
/// - `/v1/models`, `/api/v1/models` - Lists the backend's models
/// - `/v1/chat/completions`, `/api/v1/chat/completions` - Non-streaming chat completions
#[instrument(skip(state))]
pub fn build_router<T: HttpClient + Clone + Send + Sync + 'static>(state: AppState<T>) -> Router {
    info!("Building router");
    Router::new()
        .route("/v1/models", get(models_handler::<T>))
        .route("/api/v1/models", get(models_handler::<T>))
        .route("/v1/chat/completions", post(chat_completions::<T>))
        .route("/api/v1/chat/completions", post(chat_completions::<T>))
        .with_state(state)
}

/// Builds a router for the metrics endpoint.
#[instrument(skip(handle))]
pub fn build_metrics_router(handle: PrometheusHandle) -> Router {
    info!("Building metrics router");
    Router::new().route(
        "/metrics",
        axum::routing::get(move || async move { handle.render() }),
    )
}

type MetricsLayerAndHandle = (
    GenericMetricLayer<'static, PrometheusHandle, Handle>,
    PrometheusHandle,
);

/// Builds a layer and handle for prometheus metrics collection.
///
/// `prefix` must live for the whole program, since the metrics recorder is
/// installed globally.
pub fn build_metrics_layer_and_handle(
    prefix: impl Into<Cow<'static, str>>,
) -> MetricsLayerAndHandle {
    info!("Building metrics layer");
    PrometheusMetricLayerBuilder::new()
        .with_prefix(prefix)
        .enable_response_body_size(true)
        .with_endpoint_label_type(axum_prometheus::EndpointLabel::Exact)
        .with_default_metrics()
        .build_pair()
}
