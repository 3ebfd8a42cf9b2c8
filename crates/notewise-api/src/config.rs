//! Server configuration from environment variables.

use axum::http::HeaderValue;
use tracing::warn;

use notewise_core::defaults::{ANALYSIS_LANGUAGE, MAX_BODY_SIZE_BYTES, SERVER_PORT};
use notewise_core::{Error, Result};
use notewise_db::{PoolConfig, SupabaseConfig};
use notewise_inference::GeminiConfig;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/notewise";
const DEFAULT_HOST: &str = "0.0.0.0";

/// HTTP-layer settings used to build the router.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// CORS whitelist. `None` allows any origin.
    pub allowed_origins: Option<Vec<HeaderValue>>,
    /// Request body limit in bytes.
    pub max_body_size_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            allowed_origins: None,
            max_body_size_bytes: MAX_BODY_SIZE_BYTES,
        }
    }
}

/// Where search results come from.
#[derive(Debug, Clone)]
pub enum RetrievalConfig {
    /// Supabase PostgREST RPC.
    Supabase(SupabaseConfig),
    /// Direct PostgreSQL connection.
    Postgres {
        database_url: String,
        migrate_on_startup: bool,
        pool: PoolConfig,
    },
}

/// Full server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub http: HttpConfig,
    pub gemini: GeminiConfig,
    pub retrieval: RetrievalConfig,
    /// Language requested for summaries and tags.
    pub analysis_language: String,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini = GeminiConfig::from_lookup(&get)?;

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("PORT is not a valid port: {}", raw)))?,
            None => SERVER_PORT,
        };

        let retrieval = match SupabaseConfig::from_lookup(&get) {
            Some(supabase) => RetrievalConfig::Supabase(supabase),
            None => RetrievalConfig::Postgres {
                database_url: get("DATABASE_URL")
                    .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
                migrate_on_startup: get("MIGRATE_ON_STARTUP")
                    .map(|v| parse_flag(&v))
                    .unwrap_or(true),
                pool: PoolConfig::from_lookup(&get),
            },
        };

        let http = HttpConfig {
            allowed_origins: get("ALLOWED_ORIGINS")
                .filter(|v| !v.trim().is_empty())
                .map(|v| parse_allowed_origins(&v)),
            max_body_size_bytes: get("MAX_BODY_SIZE_BYTES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(MAX_BODY_SIZE_BYTES),
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            http,
            gemini,
            retrieval,
            analysis_language: get("ANALYSIS_LANGUAGE")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| ANALYSIS_LANGUAGE.to_string()),
        })
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}

/// Parse a comma-separated origin list, dropping entries that are not valid header values.
pub fn parse_allowed_origins(origins: &str) -> Vec<HeaderValue> {
    origins
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "k")])).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.analysis_language, "Turkish");
        assert!(config.http.allowed_origins.is_none());
        assert_eq!(config.http.max_body_size_bytes, 1024 * 1024);
        match config.retrieval {
            RetrievalConfig::Postgres {
                database_url,
                migrate_on_startup,
                pool,
            } => {
                assert_eq!(database_url, "postgres://localhost/notewise");
                assert!(migrate_on_startup);
                assert_eq!(pool, PoolConfig::default());
            }
            other => panic!("expected postgres retrieval, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = ApiConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_supabase_selected_when_configured() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service"),
        ]))
        .unwrap();
        assert!(matches!(config.retrieval, RetrievalConfig::Supabase(_)));
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("PORT", "8080"),
            ("MIGRATE_ON_STARTUP", "false"),
            ("ALLOWED_ORIGINS", "https://app.example.com, http://localhost:5173"),
            ("MAX_BODY_SIZE_BYTES", "2048"),
            ("ANALYSIS_LANGUAGE", "English"),
            ("DATABASE_MAX_CONNECTIONS", "8"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.analysis_language, "English");
        assert_eq!(config.http.max_body_size_bytes, 2048);
        assert_eq!(config.http.allowed_origins.map(|o| o.len()), Some(2));
        assert!(matches!(
            config.retrieval,
            RetrievalConfig::Postgres {
                migrate_on_startup: false,
                pool: PoolConfig {
                    max_connections: 8,
                    ..
                },
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = ApiConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "k"), ("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_parse_allowed_origins() {
        let origins = parse_allowed_origins("https://a.com, ,http://localhost:3000");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0].to_str().unwrap(), "https://a.com");
        assert_eq!(origins[1].to_str().unwrap(), "http://localhost:3000");
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("FALSE"));
        assert!(!parse_flag(" 0 "));
    }
}
