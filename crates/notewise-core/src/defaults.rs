//! Centralized default constants for notewise.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// PROVIDER
// =============================================================================

/// Gemini REST API base URL (v1beta surface).
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default generative model used for note analysis.
pub const GEN_MODEL: &str = "gemini-2.5-flash";

/// Default embedding model name.
pub const EMBED_MODEL: &str = "text-embedding-004";

/// Namespace prefix that fully qualifies a Gemini model identifier.
pub const MODEL_NAMESPACE: &str = "models/";

/// Embedding dimension produced by text-embedding-004.
pub const EMBED_DIMENSION: usize = 768;

/// Language the analysis prompt asks the model to answer in.
pub const ANALYSIS_LANGUAGE: &str = "Turkish";

// =============================================================================
// ANALYSIS
// =============================================================================

/// Maximum characters kept from the note when building a fallback summary.
pub const FALLBACK_SUMMARY_CHARS: usize = 200;

/// Marker appended to a fallback summary that was truncated.
pub const ELLIPSIS: &str = "...";

/// UI mode assumed when an enrichment request does not name one.
pub const UI_MODE: &str = "auto";

/// Lowest importance score.
pub const IMPORTANCE_MIN: u8 = 1;

/// Highest importance score.
pub const IMPORTANCE_MAX: u8 = 5;

// =============================================================================
// SEARCH
// =============================================================================

/// Result count requested from the retrieval engine when the caller gives none.
pub const SEARCH_LIMIT: i64 = 20;

/// Name of the retrieval function (SQL function / PostgREST RPC).
pub const SEARCH_RPC: &str = "ai_search_notes";

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP listen port.
pub const SERVER_PORT: u16 = 3000;

/// Default request body limit.
pub const MAX_BODY_SIZE_BYTES: usize = 1024 * 1024;

/// Embedding calls slower than this are logged as slow.
pub const SLOW_EMBED_MS: u64 = 5_000;

/// Generation calls slower than this are logged as slow.
pub const SLOW_GEN_MS: u64 = 30_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_importance_bounds_are_ordered() {
        assert!(IMPORTANCE_MIN < IMPORTANCE_MAX);
    }

    #[test]
    fn test_model_namespace_ends_with_slash() {
        assert!(MODEL_NAMESPACE.ends_with('/'));
        assert!(!EMBED_MODEL.starts_with(MODEL_NAMESPACE));
    }

    #[test]
    fn test_search_limit_positive() {
        assert!(SEARCH_LIMIT > 0);
    }
}
