//! Structured logging schema for notewise.
//!
//! Spans and events use the same field names across subsystems so log
//! aggregation can query them uniformly:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `subsystem` | "api", "search", "database", "inference" |
//! | `component` | "gemini", "orchestrator", "pipeline", "supabase", ... |
//! | `op` | logical operation ("embed", "generate", "search", ...) |
//! | `model` | provider model name |
//! | `duration_ms` | wall-clock duration |
//! | `slow` | set on calls over the slow threshold |
//!
//! Fields declared `Empty` on a span and filled in once the value is known are
//! recorded through the constants below.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Request failed because a collaborator failed |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | High-volume data (raw model text, result rows) |

/// Number of records returned by a search.
pub const RESULT_COUNT: &str = "result_count";

/// Number of values in an embedding vector.
pub const DIMENSION: &str = "dimension";

/// Whether the extractor fell back to the deterministic record.
pub const FALLBACK: &str = "fallback";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_field_names_are_unique_snake_case() {
        let fields = [RESULT_COUNT, DIMENSION, FALLBACK];
        let mut seen = std::collections::HashSet::new();
        for field in fields {
            assert!(field.chars().all(|c| c.is_ascii_lowercase() || c == '_'));
            assert!(seen.insert(field), "duplicate field name {}", field);
        }
    }
}
