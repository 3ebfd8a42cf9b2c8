//! PostgreSQL connection pool.
//!
//! Each search issues a single `ai_search_notes` call, so the pool stays
//! small. Sizing can be overridden from the environment.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use notewise_core::{Error, Result};

/// Default maximum number of connections in the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default time to wait for a free connection, in seconds.
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Pool sizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        }
    }
}

impl PoolConfig {
    /// Read `DATABASE_MAX_CONNECTIONS` and `DATABASE_ACQUIRE_TIMEOUT_SECS`.
    ///
    /// Unset, unparsable or zero values keep the defaults.
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let positive = |name: &str| {
            get(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
        };

        let defaults = Self::default();
        Self {
            max_connections: positive("DATABASE_MAX_CONNECTIONS")
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(defaults.max_connections),
            acquire_timeout: positive("DATABASE_ACQUIRE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
        }
    }

    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(IDLE_TIMEOUT)
            .max_lifetime(MAX_LIFETIME)
    }
}

/// Open a pool and wait for the first connection.
pub async fn create_pool(database_url: &str, config: &PoolConfig) -> Result<PgPool> {
    let start = Instant::now();

    info!(
        subsystem = "database",
        component = "pool",
        op = "create",
        max_connections = config.max_connections,
        acquire_timeout_secs = config.acquire_timeout.as_secs(),
        "Creating database connection pool"
    );

    let pool = config
        .options()
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "database",
        component = "pool",
        op = "established",
        duration_ms = start.elapsed().as_millis() as u64,
        "Database connection pool established"
    );
    Ok(pool)
}

/// Connection counts at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}

impl PoolStats {
    /// Every open connection is checked out.
    pub fn is_exhausted(&self) -> bool {
        self.size > 0 && self.idle == 0
    }
}

/// Snapshot the pool, warning when no connection is idle.
pub fn pool_stats(pool: &PgPool) -> PoolStats {
    let stats = PoolStats {
        size: pool.size(),
        idle: pool.num_idle(),
    };

    debug!(
        subsystem = "database",
        component = "pool",
        pool_size = stats.size,
        pool_idle = stats.idle,
        "Pool stats"
    );
    if stats.is_exhausted() {
        warn!(
            subsystem = "database",
            component = "pool",
            pool_size = stats.size,
            "Connection pool has no idle connections"
        );
    }
    stats
}
