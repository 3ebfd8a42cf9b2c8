//! Direct PostgreSQL retrieval through the `ai_search_notes` SQL function.

use std::time::Instant;

use async_trait::async_trait;
use pgvector::Vector;
use serde_json::{json, Value as JsonValue};
use sqlx::{PgPool, Row};
use tracing::{debug, instrument, Span};

use notewise_core::logging::RESULT_COUNT;
use notewise_core::{Error, Result, RetrievalBackend, RetrievalParams};

use crate::pool::{pool_stats, PoolStats};

const SEARCH_SQL: &str = "SELECT to_jsonb(r) AS item \
     FROM ai_search_notes($1::vector, $2::uuid, $3::int, $4::text) r";

/// pgvector-backed retrieval.
#[derive(Clone)]
pub struct PgRetrieval {
    pool: PgPool,
}

impl PgRetrieval {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connection counts of the underlying pool.
    pub fn pool_stats(&self) -> PoolStats {
        pool_stats(&self.pool)
    }
}

/// Convert a database failure into a retrieval error with `{message, code}` details.
pub(crate) fn retrieval_error(e: sqlx::Error) -> Error {
    let details = match &e {
        sqlx::Error::Database(db_err) => json!({
            "message": db_err.message(),
            "code": db_err.code().map(|c| c.into_owned()),
        }),
        other => json!({
            "message": other.to_string(),
            "code": JsonValue::Null,
        }),
    };
    Error::Retrieval {
        message: e.to_string(),
        details,
    }
}

/// The SQL function takes an `int`; out-of-range requests are clamped.
fn match_count(requested: i64) -> i32 {
    requested.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[async_trait]
impl RetrievalBackend for PgRetrieval {
    #[instrument(skip(self, params), fields(subsystem = "database", component = "retrieval", op = "ai_search_notes", match_count = params.match_count, has_embedding = params.query_embedding.is_some(), tag_filter = ?params.tag_filter, result_count = tracing::field::Empty))]
    async fn search_notes(&self, params: &RetrievalParams) -> Result<Vec<JsonValue>> {
        let start = Instant::now();

        let embedding: Option<Vector> = params
            .query_embedding
            .as_ref()
            .map(|e| Vector::from(e.as_slice().to_vec()));

        let rows = sqlx::query(SEARCH_SQL)
            .bind(embedding)
            .bind(&params.user_id)
            .bind(match_count(params.match_count))
            .bind(params.tag_filter.as_deref())
            .fetch_all(&self.pool)
            .await
            .map_err(retrieval_error)?;

        let items = rows
            .iter()
            .map(|row| row.try_get::<JsonValue, _>("item"))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(retrieval_error)?;

        Span::current().record(RESULT_COUNT, items.len());
        debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            "Retrieval complete"
        );
        self.pool_stats();
        Ok(items)
    }

    fn backend_name(&self) -> &str {
        "postgres"
    }
}
