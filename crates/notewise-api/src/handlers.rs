//! Route handlers.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use notewise_core::{
    EmbedRequest, EmbedResponse, EnrichRequest, EnrichedNote, SearchQuery, SearchResult,
};

use crate::error::ApiError;
use crate::AppState;

/// JSON body extractor where an empty body means `{}`.
///
/// Any body that does not decode as `T` is rejected with
/// `400 {"error": "Invalid JSON body"}`.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        let raw: &[u8] = if bytes.is_empty() { b"{}" } else { &bytes };

        serde_json::from_slice(raw).map(JsonBody).map_err(|e| {
            debug!(error = %e, "Rejected request body");
            ApiError::invalid_json()
        })
    }
}

/// Fallback for known paths hit with an unrouted method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Fallback for unknown paths.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `POST /api/v1/notes/process`: summary, tags, meta and embedding for a note.
#[instrument(skip(state, request), fields(subsystem = "api", op = "process_note"))]
pub async fn process_note(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<EnrichRequest>,
) -> Result<Json<EnrichedNote>, ApiError> {
    let note = state.pipeline.enrich(&request).await?;
    Ok(Json(note))
}

/// `POST /api/v1/notes/search`: hybrid vector + tag search.
#[instrument(skip(state, query), fields(subsystem = "api", op = "search_notes"))]
pub async fn search_notes(
    State(state): State<AppState>,
    JsonBody(query): JsonBody<SearchQuery>,
) -> Result<Json<SearchResult>, ApiError> {
    let result = state.search.search(&query).await?;
    Ok(Json(result))
}

/// `POST /api/v1/embed`: embedding for a single text.
#[instrument(skip(state, request), fields(subsystem = "api", op = "embed_text"))]
pub async fn embed_text(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<EmbedRequest>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let text = request.text.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(ApiError::BadRequest("text is required".to_string()));
    }

    let embedding = state.embedder.embed(text).await?;
    Ok(Json(EmbedResponse { embedding }))
}
