//! Note enrichment pipeline.
//!
//! Runs model analysis and embedding for a single note and assembles the
//! combined result. The two calls share no data, so they run concurrently;
//! the first failure fails the whole enrichment.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, Span};

use notewise_core::defaults::ANALYSIS_LANGUAGE;
use notewise_core::logging::{DIMENSION, FALLBACK};
use notewise_core::{
    EmbeddingBackend, EnrichRequest, EnrichedNote, Error, GenerationBackend, NoteAnalysis, Result,
};

use crate::analysis::{extract_with_source, ExtractionSource};
use crate::prompt::analysis_prompt;

/// Title + content in, summary/tags/meta + embedding out.
#[derive(Clone)]
pub struct NoteEnrichmentPipeline {
    generator: Arc<dyn GenerationBackend>,
    embedder: Arc<dyn EmbeddingBackend>,
    language: String,
}

impl NoteEnrichmentPipeline {
    pub fn new(generator: Arc<dyn GenerationBackend>, embedder: Arc<dyn EmbeddingBackend>) -> Self {
        Self {
            generator,
            embedder,
            language: ANALYSIS_LANGUAGE.to_string(),
        }
    }

    /// Language requested for the summary and tags.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Shared embedder, also used for standalone embedding requests.
    pub fn embedder(&self) -> Arc<dyn EmbeddingBackend> {
        self.embedder.clone()
    }

    /// Analyse and embed one note.
    ///
    /// Fails with [`Error::InvalidInput`] before any model call when both
    /// title and content are blank.
    #[instrument(skip(self, request), fields(subsystem = "inference", component = "pipeline", op = "enrich", mode = %request.mode, dimension = tracing::field::Empty, fallback = tracing::field::Empty))]
    pub async fn enrich(&self, request: &EnrichRequest) -> Result<EnrichedNote> {
        let text = request.combined_text();
        if text.is_empty() {
            return Err(Error::InvalidInput(
                "title or content is required".to_string(),
            ));
        }

        let start = Instant::now();

        let (analysis, embedding) =
            tokio::try_join!(self.analyze(&text, &request.mode), self.embedder.embed(&text))?;

        Span::current().record(DIMENSION, embedding.len());
        info!(
            tag_count = analysis.tags.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Note enriched"
        );

        Ok(EnrichedNote {
            analysis,
            embedding,
        })
    }

    /// Ask the model for an analysis of `text` and normalize its answer.
    ///
    /// Only provider failures are errors; an unusable completion yields the
    /// fallback analysis.
    pub async fn analyze(&self, text: &str, ui_mode: &str) -> Result<NoteAnalysis> {
        let prompt = analysis_prompt(text, ui_mode, &self.language);
        let raw = self.generator.generate(&prompt).await?;

        let (analysis, source) = extract_with_source(&raw, text);
        let fallback = source == ExtractionSource::Fallback;
        Span::current().record(FALLBACK, fallback);
        debug!(
            model = self.generator.model_name(),
            fallback,
            "Analysis extracted"
        );
        Ok(analysis)
    }
}
