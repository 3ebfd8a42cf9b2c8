//! Core traits for notewise abstractions.
//!
//! These traits define the interfaces that concrete backends must satisfy,
//! enabling pluggable providers and testability.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::models::{Embedding, RetrievalParams};

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for generating text embeddings.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Embed a single, already trimmed, non-empty text.
    async fn embed(&self, text: &str) -> Result<Embedding>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate a completion for a single free-text prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

// =============================================================================
// RETRIEVAL TRAITS
// =============================================================================

/// Hybrid vector + tag retrieval engine.
///
/// Implementations forward the call to the engine and return its records
/// untouched and in order. Failures should be reported as
/// [`Error::Retrieval`](crate::Error::Retrieval) carrying the engine's
/// diagnostic payload.
#[async_trait]
pub trait RetrievalBackend: Send + Sync {
    /// Run the search and return the engine's records.
    async fn search_notes(&self, params: &RetrievalParams) -> Result<Vec<JsonValue>>;

    /// Short backend name for logs ("postgres", "supabase", ...).
    fn backend_name(&self) -> &str;
}
