//! Search orchestration: query and/or tag in, ranked notes out.
//!
//! Decides whether a search needs an embedding (free-text query present) or
//! can run as a pure tag filter, then issues exactly one retrieval call.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, Span};

use notewise_core::defaults::SEARCH_LIMIT;
use notewise_core::logging::RESULT_COUNT;
use notewise_core::{
    EmbeddingBackend, Error, Result, RetrievalBackend, RetrievalParams, SearchQuery, SearchResult,
};

/// Resolve the requested result count.
///
/// Any finite limit is forwarded to the engine as given, with the fraction
/// dropped since `match_count` is an integer. Zero and negative values are
/// left for the engine to judge. Absent or non-finite limits use the default
/// of 20.
pub fn resolve_limit(limit: Option<f64>) -> i64 {
    match limit {
        Some(l) if l.is_finite() => l as i64,
        _ => SEARCH_LIMIT,
    }
}

/// Trimmed, non-empty value of an optional field.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Hybrid search over one user's notes.
#[derive(Clone)]
pub struct SearchOrchestrator {
    embedder: Arc<dyn EmbeddingBackend>,
    retrieval: Arc<dyn RetrievalBackend>,
}

impl SearchOrchestrator {
    pub fn new(embedder: Arc<dyn EmbeddingBackend>, retrieval: Arc<dyn RetrievalBackend>) -> Self {
        Self {
            embedder,
            retrieval,
        }
    }

    /// Validate the query and build the retrieval arguments, minus the embedding.
    ///
    /// Returns the lower-cased free-text query to embed, if any.
    fn plan(query: &SearchQuery) -> Result<(Option<String>, RetrievalParams)> {
        let user_id = non_blank(query.user_id.as_deref())
            .ok_or_else(|| Error::InvalidInput("user_id is required".to_string()))?;

        let text = non_blank(query.query.as_deref());
        let tag = non_blank(query.tag.as_deref());
        if text.is_none() && tag.is_none() {
            return Err(Error::InvalidInput(
                "Either query or tag is required".to_string(),
            ));
        }

        let params = RetrievalParams {
            query_embedding: None,
            user_id: user_id.to_string(),
            match_count: resolve_limit(query.limit),
            tag_filter: tag.map(str::to_lowercase),
        };
        Ok((text.map(str::to_lowercase), params))
    }

    /// Run a search.
    ///
    /// Validation failures are reported before any external call. Retrieval
    /// failures surface as [`Error::Retrieval`] with the engine's payload.
    #[instrument(skip(self, query), fields(subsystem = "search", component = "orchestrator", op = "search", retrieval = self.retrieval.backend_name(), result_count = tracing::field::Empty))]
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let start = Instant::now();
        let (text, mut params) = Self::plan(query)?;

        match text {
            Some(text) => {
                let embed_start = Instant::now();
                let embedding = self.embedder.embed(&text).await?;
                debug!(
                    dimension = embedding.len(),
                    duration_ms = embed_start.elapsed().as_millis() as u64,
                    "Query embedded"
                );
                params.query_embedding = Some(embedding);
            }
            None => {
                debug!(
                    tag_filter = ?params.tag_filter,
                    "Tag-only search, skipping embedding"
                );
            }
        }

        let items = self
            .retrieval
            .search_notes(&params)
            .await
            .map_err(Error::into_retrieval)?;

        Span::current().record(RESULT_COUNT, items.len());
        info!(
            match_count = params.match_count,
            semantic = params.query_embedding.is_some(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Search complete"
        );
        Ok(SearchResult { items })
    }
}
