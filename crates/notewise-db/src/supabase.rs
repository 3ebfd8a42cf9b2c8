//! Retrieval through the Supabase PostgREST RPC endpoint.
//!
//! Calls `POST {url}/rest/v1/rpc/ai_search_notes` with the service role key.
//! The JSON body carries the function arguments by name.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use tracing::{debug, info, instrument, warn};

use notewise_core::defaults::SEARCH_RPC;
use notewise_core::{Error, Result, RetrievalBackend, RetrievalParams};

/// Supabase project connection settings.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub url: String,
    /// Service role key, sent as `apikey` and bearer token.
    pub service_role_key: String,
    /// Optional HTTP client timeout.
    pub timeout_seconds: Option<u64>,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_role_key: service_role_key.into(),
            timeout_seconds: None,
        }
    }

    /// Read `SUPABASE_URL` and `SUPABASE_SERVICE_ROLE_KEY`.
    ///
    /// Returns `None` unless both are set and non-empty.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), reading from an arbitrary source.
    pub fn from_lookup<F>(get: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| get(name).filter(|v| !v.trim().is_empty());
        let url = present("SUPABASE_URL")?;
        let key = present("SUPABASE_SERVICE_ROLE_KEY")?;
        Some(Self::new(url, key))
    }
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("service_role_key", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// PostgREST RPC retrieval backend.
pub struct SupabaseRpc {
    client: Client,
    endpoint: String,
    service_role_key: String,
}

impl SupabaseRpc {
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        let mut client_builder = Client::builder();
        if let Some(secs) = config.timeout_seconds {
            client_builder = client_builder.timeout(Duration::from_secs(secs));
        }
        let client = client_builder
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let endpoint = format!(
            "{}/rest/v1/rpc/{}",
            config.url.trim_end_matches('/'),
            SEARCH_RPC
        );

        info!(
            subsystem = "database",
            component = "supabase",
            endpoint = %endpoint,
            "Initializing Supabase RPC retrieval"
        );

        Ok(Self {
            client,
            endpoint,
            service_role_key: config.service_role_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Pick a human-readable message out of a PostgREST error payload.
fn error_message(details: &JsonValue, status: reqwest::StatusCode) -> String {
    details
        .get("message")
        .and_then(JsonValue::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("RPC {} failed: {}", SEARCH_RPC, status.as_u16()))
}

#[async_trait]
impl RetrievalBackend for SupabaseRpc {
    #[instrument(skip(self, params), fields(subsystem = "database", component = "supabase", op = "ai_search_notes", match_count = params.match_count, has_embedding = params.query_embedding.is_some(), tag_filter = ?params.tag_filter))]
    async fn search_notes(&self, params: &RetrievalParams) -> Result<Vec<JsonValue>> {
        let start = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .json(params)
            .send()
            .await
            .map_err(|e| Error::retrieval(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::retrieval(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let details = serde_json::from_str::<JsonValue>(&body)
                .unwrap_or_else(|_| JsonValue::String(body.clone()));
            let message = error_message(&details, status);
            warn!(status = status.as_u16(), error = %message, "RPC returned an error");
            return Err(Error::Retrieval { message, details });
        }

        let items = match serde_json::from_str::<JsonValue>(&body) {
            Ok(JsonValue::Array(items)) => items,
            Ok(_) | Err(_) => {
                warn!(body_len = body.len(), "RPC returned a non-array body, treating as empty");
                Vec::new()
            }
        };

        debug!(
            result_count = items.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Retrieval complete"
        );
        Ok(items)
    }

    fn backend_name(&self) -> &str {
        "supabase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_from_url() {
        let rpc = SupabaseRpc::new(SupabaseConfig::new("https://abc.supabase.co/", "k")).unwrap();
        assert_eq!(
            rpc.endpoint(),
            "https://abc.supabase.co/rest/v1/rpc/ai_search_notes"
        );
    }

    #[test]
    fn test_from_lookup_needs_both_values() {
        assert!(SupabaseConfig::from_lookup(|_| None).is_none());
        assert!(SupabaseConfig::from_lookup(|name| {
            (name == "SUPABASE_URL").then(|| "https://x.supabase.co".to_string())
        })
        .is_none());

        let config = SupabaseConfig::from_lookup(|name| match name {
            "SUPABASE_URL" => Some("https://x.supabase.co".to_string()),
            "SUPABASE_SERVICE_ROLE_KEY" => Some("k".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.url, "https://x.supabase.co");
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", SupabaseConfig::new("https://x", "service-secret"));
        assert!(!rendered.contains("service-secret"));
    }

    #[test]
    fn test_error_message_prefers_payload() {
        let details = json!({"message": "function ai_search_notes does not exist", "code": "42883"});
        assert_eq!(
            error_message(&details, reqwest::StatusCode::NOT_FOUND),
            "function ai_search_notes does not exist"
        );
        assert_eq!(
            error_message(&json!("oops"), reqwest::StatusCode::BAD_GATEWAY),
            "RPC ai_search_notes failed: 502"
        );
    }
}
