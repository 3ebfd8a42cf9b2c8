//! # notewise-db
//!
//! Retrieval layer for notewise.
//!
//! This crate provides:
//! - Connection pool management
//! - Bundled migrations for the `notes` table and the `ai_search_notes` function
//! - [`PgRetrieval`]: calls `ai_search_notes` directly over PostgreSQL with pgvector
//! - [`SupabaseRpc`]: calls the same function through the Supabase REST RPC endpoint
//!
//! ## Example
//!
//! ```rust,ignore
//! use notewise_db::Database;
//! use notewise_core::{RetrievalBackend, RetrievalParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/notewise").await?;
//!     db.migrate().await?;
//!
//!     let items = db.retrieval.search_notes(&RetrievalParams {
//!         query_embedding: None,
//!         user_id: "0190f7a4-0000-7000-8000-000000000000".to_string(),
//!         match_count: 20,
//!         tag_filter: Some("work".to_string()),
//!     }).await?;
//!
//!     println!("{} notes", items.len());
//!     Ok(())
//! }
//! ```

pub mod pool;
pub mod retrieval;
pub mod supabase;

pub use pool::{create_pool, pool_stats, PoolConfig, PoolStats};
pub use retrieval::PgRetrieval;
pub use supabase::{SupabaseConfig, SupabaseRpc};

// Re-export core types
pub use notewise_core::*;

/// Connection pool plus the retrieval backend built on it.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// `ai_search_notes` retrieval.
    pub retrieval: PgRetrieval,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            retrieval: PgRetrieval::new(pool.clone()),
            pool,
        }
    }

    /// Connect with the default pool configuration.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_config(url, &PoolConfig::default()).await
    }

    /// Connect with explicit pool sizing.
    pub async fn connect_with_config(url: &str, config: &PoolConfig) -> Result<Self> {
        let pool = create_pool(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
