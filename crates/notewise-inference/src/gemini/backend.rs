//! Gemini inference backend implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use tracing::{debug, info, instrument, warn};

use notewise_core::defaults::{
    EMBED_MODEL, GEMINI_BASE_URL, GEN_MODEL, MODEL_NAMESPACE, SLOW_EMBED_MS, SLOW_GEN_MS,
};
use notewise_core::{
    coerce_number, Embedding, EmbeddingBackend, Error, GenerationBackend, Result,
};

use super::types::*;

/// Configuration for the Gemini backend.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API root, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub base_url: String,
    /// API key, sent as the `key` query parameter.
    pub api_key: String,
    /// Model used for `generateContent`.
    pub gen_model: String,
    /// Model used for `embedContent`. Bare or `models/` qualified.
    pub embed_model: String,
    /// Optional HTTP client timeout. `None` leaves requests unbounded.
    pub timeout_seconds: Option<u64>,
}

impl GeminiConfig {
    /// Default endpoints and models with the given key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            base_url: GEMINI_BASE_URL.to_string(),
            api_key: api_key.into(),
            gen_model: GEN_MODEL.to_string(),
            embed_model: EMBED_MODEL.to_string(),
            timeout_seconds: None,
        }
    }

    /// Read the configuration from environment variables.
    ///
    /// `GEMINI_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = get("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::Config("GEMINI_API_KEY is not set".to_string()))?;

        Ok(Self {
            base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
            api_key,
            gen_model: get("GEMINI_MODEL").unwrap_or_else(|| GEN_MODEL.to_string()),
            embed_model: get("GEMINI_EMBED_MODEL").unwrap_or_else(|| EMBED_MODEL.to_string()),
            timeout_seconds: get("GEMINI_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0),
        })
    }
}

// Hand-written so the key never reaches a log line.
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("gen_model", &self.gen_model)
            .field("embed_model", &self.embed_model)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Qualify a model identifier with the `models/` namespace.
///
/// Already-qualified names are returned unchanged.
pub fn qualify_model_name(name: &str) -> String {
    if name.starts_with(MODEL_NAMESPACE) {
        name.to_string()
    } else {
        format!("{}{}", MODEL_NAMESPACE, name)
    }
}

/// Gemini backend for embeddings and text generation.
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
    embed_model: String,
    gen_model: String,
}

impl GeminiBackend {
    /// Create a new Gemini backend with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let mut client_builder = Client::builder();
        if let Some(secs) = config.timeout_seconds {
            client_builder = client_builder.timeout(Duration::from_secs(secs));
        }

        let client = client_builder
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let embed_model = qualify_model_name(&config.embed_model);
        let gen_model = qualify_model_name(&config.gen_model);

        info!(
            subsystem = "inference",
            component = "gemini",
            base_url = %config.base_url,
            embed_model = %embed_model,
            gen_model = %gen_model,
            timeout_seconds = ?config.timeout_seconds,
            "Initializing Gemini backend"
        );

        Ok(Self {
            client,
            config,
            embed_model,
            gen_model,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, qualified_model: &str, method: &str) -> String {
        format!(
            "{}/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            qualified_model,
            method
        )
    }

    fn post(&self, url: String) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .query(&[("key", self.config.api_key.as_str())])
    }
}

/// Strip the URL from a transport error; it carries the API key.
fn transport_error(e: reqwest::Error) -> String {
    format!("Request failed: {}", e.without_url())
}

/// Coerce provider elements to `f32`. Non-numeric elements become NaN.
fn coerce_values(values: &[JsonValue]) -> Embedding {
    Embedding::new(values.iter().map(|v| coerce_number(v) as f32).collect())
}

#[async_trait]
impl EmbeddingBackend for GeminiBackend {
    #[instrument(skip(self, text), fields(subsystem = "inference", component = "gemini", op = "embed", model = %self.embed_model, input_len = text.len()))]
    async fn embed(&self, text: &str) -> Result<Embedding> {
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("text is required".to_string()));
        }

        let start = Instant::now();

        let request = EmbedContentRequest {
            model: self.embed_model.clone(),
            content: Content::text(text),
        };

        let response = self
            .post(self.endpoint(&self.embed_model, "embedContent"))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(transport_error(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!(
                "Gemini embedContent failed: {} - {}",
                status.as_u16(),
                body
            )));
        }

        let data: JsonValue = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("Failed to parse response: {}", e.without_url())))?;

        let values = serde_json::from_value::<EmbedContentResponse>(data)
            .ok()
            .and_then(EmbedContentResponse::into_values)
            .filter(|values| !values.is_empty())
            .ok_or_else(|| Error::Embedding("Gemini embedding invalid".to_string()))?;

        let embedding = coerce_values(&values);
        let nan_count = embedding.nan_count();
        if nan_count > 0 {
            warn!(
                nan_count,
                dimension = embedding.len(),
                "Embedding contains non-numeric elements"
            );
        }

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            dimension = embedding.len(),
            duration_ms = elapsed,
            "Embedding complete"
        );
        if elapsed > SLOW_EMBED_MS {
            warn!(
                duration_ms = elapsed,
                input_len = text.len(),
                slow = true,
                "Slow embedding operation"
            );
        }
        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        &self.embed_model
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    #[instrument(skip(self, prompt), fields(subsystem = "inference", component = "gemini", op = "generate", model = %self.gen_model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();

        let request = GenerateContentRequest {
            contents: vec![Content::user(prompt)],
        };

        let response = self
            .post(self.endpoint(&self.gen_model, "generateContent"))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(transport_error(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), body = %body, "Gemini error body");
            return Err(Error::Inference(format!(
                "Gemini generateContent failed: {}",
                status.as_u16()
            )));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e.without_url())))?;

        let content = result
            .into_text()
            .ok_or_else(|| Error::Inference("Gemini response invalid (no text)".to_string()))?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            response_len = content.len(),
            duration_ms = elapsed,
            "Generation complete"
        );
        if elapsed > SLOW_GEN_MS {
            warn!(
                duration_ms = elapsed,
                prompt_len = prompt.len(),
                slow = true,
                "Slow generation operation"
            );
        }
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.gen_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_config() -> GeminiConfig {
        GeminiConfig {
            base_url: "http://localhost:9999/v1beta/".to_string(),
            ..GeminiConfig::with_api_key("test-key")
        }
    }

    #[test]
    fn test_qualify_bare_model_name() {
        assert_eq!(
            qualify_model_name("text-embedding-004"),
            "models/text-embedding-004"
        );
    }

    #[test]
    fn test_qualify_already_qualified_name() {
        assert_eq!(
            qualify_model_name("models/text-embedding-004"),
            "models/text-embedding-004"
        );
    }

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::with_api_key("k");
        assert_eq!(config.base_url, GEMINI_BASE_URL);
        assert_eq!(config.gen_model, "gemini-2.5-flash");
        assert_eq!(config.embed_model, "text-embedding-004");
        assert!(config.timeout_seconds.is_none());
    }

    #[test]
    fn test_from_lookup_requires_key() {
        let err = GeminiConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m == "GEMINI_API_KEY is not set"));

        let err = GeminiConfig::from_lookup(|name| {
            (name == "GEMINI_API_KEY").then(|| "  ".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = GeminiConfig::from_lookup(|name| match name {
            "GEMINI_API_KEY" => Some("k".to_string()),
            "GEMINI_EMBED_MODEL" => Some("models/custom-embed".to_string()),
            "GEMINI_TIMEOUT_SECS" => Some("15".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.embed_model, "models/custom-embed");
        assert_eq!(config.gen_model, GEN_MODEL);
        assert_eq!(config.timeout_seconds, Some(15));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", GeminiConfig::with_api_key("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let backend = GeminiBackend::new(test_config()).unwrap();
        assert_eq!(
            backend.endpoint("models/gemini-2.5-flash", "generateContent"),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_model_names_are_qualified() {
        let backend = GeminiBackend::new(test_config()).unwrap();
        assert_eq!(EmbeddingBackend::model_name(&backend), "models/text-embedding-004");
        assert_eq!(GenerationBackend::model_name(&backend), "models/gemini-2.5-flash");
    }

    #[test]
    fn test_coerce_values_tolerates_strings_and_garbage() {
        let embedding = coerce_values(&[json!(0.5), json!("0.25"), json!("abc"), json!(null)]);
        let values = embedding.as_slice();
        assert_eq!(values[0], 0.5);
        assert_eq!(values[1], 0.25);
        assert!(values[2].is_nan());
        assert_eq!(values[3], 0.0);
        assert_eq!(embedding.nan_count(), 1);
    }

    #[tokio::test]
    async fn test_embed_rejects_blank_text_without_network() {
        let backend = GeminiBackend::new(test_config()).unwrap();
        let err = backend.embed("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
