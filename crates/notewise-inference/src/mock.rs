//! Mock inference backend for deterministic testing.
//!
//! Implements both [`EmbeddingBackend`] and [`GenerationBackend`] without any
//! network access, and records every call so tests can assert which
//! collaborators were (or were not) used.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use notewise_inference::mock::MockInferenceBackend;
//! use notewise_core::EmbeddingBackend;
//!
//! #[tokio::test]
//! async fn test_with_mock_backend() {
//!     let backend = MockInferenceBackend::new()
//!         .with_dimension(8)
//!         .with_fixed_response(r#"{"summary":"ok"}"#);
//!
//!     let embedding = backend.embed("test text").await.unwrap();
//!     assert_eq!(embedding.len(), 8);
//! }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use notewise_core::defaults::EMBED_DIMENSION;
use notewise_core::{Embedding, EmbeddingBackend, Error, GenerationBackend, Result};

/// Mock inference backend for testing.
#[derive(Clone)]
pub struct MockInferenceBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    dimension: usize,
    response: String,
    latency_ms: u64,
    fail_embed: Option<String>,
    fail_generate: Option<String>,
}

/// A recorded backend call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub input: String,
    pub timestamp: std::time::Instant,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            dimension: EMBED_DIMENSION,
            response: "Mock response".to_string(),
            latency_ms: 0,
            fail_embed: None,
            fail_generate: None,
        }
    }
}

impl MockInferenceBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the embedding dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        Arc::make_mut(&mut self.config).dimension = dimension;
        self
    }

    /// Set the completion returned for every generation request.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).response = response.into();
        self
    }

    /// Set simulated latency for all operations.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// Make every embed call fail with an embedding error.
    pub fn failing_embed(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).fail_embed = Some(message.into());
        self
    }

    /// Make every generate call fail with an inference error.
    pub fn failing_generate(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).fail_generate = Some(message.into());
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    /// Inputs of all embed calls, in order.
    pub fn embedded_texts(&self) -> Vec<String> {
        self.inputs_for("embed")
    }

    /// Get number of embed calls.
    pub fn embed_call_count(&self) -> usize {
        self.inputs_for("embed").len()
    }

    /// Get number of generation calls.
    pub fn generate_call_count(&self) -> usize {
        self.inputs_for("generate").len()
    }

    fn inputs_for(&self, operation: &str) -> Vec<String> {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .map(|c| c.input.clone())
            .collect()
    }

    fn log_call(&self, operation: &str, input: &str) {
        self.call_log.lock().unwrap().push(MockCall {
            operation: operation.to_string(),
            input: input.to_string(),
            timestamp: std::time::Instant::now(),
        });
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }
}

impl Default for MockInferenceBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingBackend for MockInferenceBackend {
    async fn embed(&self, text: &str) -> Result<Embedding> {
        self.log_call("embed", text);
        self.simulate_latency().await;

        if let Some(message) = &self.config.fail_embed {
            return Err(Error::Embedding(message.clone()));
        }

        Ok(Embedding::new(MockEmbeddingGenerator::generate(
            text,
            self.config.dimension,
        )))
    }

    fn model_name(&self) -> &str {
        "mock-embed"
    }
}

#[async_trait]
impl GenerationBackend for MockInferenceBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.log_call("generate", prompt);
        self.simulate_latency().await;

        if let Some(message) = &self.config.fail_generate {
            return Err(Error::Inference(message.clone()));
        }

        Ok(self.config.response.clone())
    }

    fn model_name(&self) -> &str {
        "mock-gen"
    }
}

/// Mock embedding generator with deterministic output.
pub struct MockEmbeddingGenerator;

impl MockEmbeddingGenerator {
    /// Generate a deterministic embedding from text.
    ///
    /// Uses character-based hashing for reproducibility. The same text
    /// will always produce the same embedding.
    pub fn generate(text: &str, dimension: usize) -> Vec<f32> {
        let mut vec = vec![0.0; dimension];
        if dimension == 0 {
            return vec;
        }

        for (i, c) in text.chars().enumerate() {
            let idx = (c as usize + i) % dimension;
            vec[idx] += 0.1;
        }

        let magnitude: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            vec.iter_mut().for_each(|x| *x /= magnitude);
        }
        vec
    }
}
