//! # notewise-inference
//!
//! Model inference for notewise.
//!
//! This crate provides:
//! - Gemini backend for embeddings and text generation (feature `gemini`, default)
//! - Analysis extraction: turns a raw model completion into a validated
//!   [`NoteAnalysis`], falling back to a deterministic record when the model
//!   output is unusable
//! - The analysis prompt
//! - The note enrichment pipeline (analysis + embedding for one note)
//! - Mock backends for tests (feature `mock`)
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use notewise_inference::{EnrichRequest, GeminiBackend, NoteEnrichmentPipeline};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = Arc::new(GeminiBackend::from_env().unwrap());
//!     let pipeline = NoteEnrichmentPipeline::new(backend.clone(), backend);
//!     let note = pipeline
//!         .enrich(&EnrichRequest::new("Groceries", "Buy milk"))
//!         .await
//!         .unwrap();
//!     println!("{:?}", note.analysis.tags);
//! }
//! ```

pub mod analysis;
pub mod pipeline;
pub mod prompt;

#[cfg(feature = "gemini")]
pub mod gemini;

// Mock inference backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use notewise_core::*;

#[cfg(feature = "gemini")]
pub use gemini::{qualify_model_name, GeminiBackend, GeminiConfig};

pub use analysis::{extract, extract_with_source, fallback_analysis, ExtractionSource};
pub use pipeline::NoteEnrichmentPipeline;
pub use prompt::analysis_prompt;
