//! notewise-api - HTTP surface for note enrichment and search.
//!
//! Exposes the enrichment pipeline, the search orchestrator and standalone
//! embedding over a small JSON API. The binary in `main.rs` wires concrete
//! backends from the environment; tests build the same [`router`] over mocks.

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use notewise_core::EmbeddingBackend;
use notewise_inference::NoteEnrichmentPipeline;
use notewise_search::SearchOrchestrator;

pub use config::{ApiConfig, HttpConfig, RetrievalConfig};
pub use error::ApiError;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: NoteEnrichmentPipeline,
    pub search: SearchOrchestrator,
    /// Embedder for `/api/v1/embed`; the same one the pipeline uses.
    pub embedder: Arc<dyn EmbeddingBackend>,
}

impl AppState {
    pub fn new(pipeline: NoteEnrichmentPipeline, search: SearchOrchestrator) -> Self {
        let embedder = pipeline.embedder();
        Self {
            pipeline,
            search,
            embedder,
        }
    }
}

// =============================================================================
// ROUTER
// =============================================================================

fn cors_layer(http: &HttpConfig) -> CorsLayer {
    let origins = match &http.allowed_origins {
        Some(list) => AllowOrigin::list(list.iter().cloned()),
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

/// Build the application router.
pub fn router(state: AppState, http: &HttpConfig) -> Router {
    Router::new()
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/v1/notes/process",
            post(handlers::process_note).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/v1/notes/search",
            post(handlers::search_notes).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/v1/embed",
            post(handlers::embed_text).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(http))
        .layer(RequestBodyLimitLayer::new(http.max_body_size_bytes))
        .with_state(state)
}
