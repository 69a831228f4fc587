//! SQLite connection pool.
//!
//! File databases run in WAL mode with a busy timeout so API handlers can
//! read while a write is in flight. In-memory databases exist per
//! connection, so their pool pins a single connection for its lifetime.

use std::str::FromStr;
use std::time::{Duration, Instant};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info, warn};

use reelnotes_core::{Error, Result};

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How long to wait for a free pooled connection.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// How long SQLite retries a locked database before failing a statement.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// URL of a private in-memory database.
pub const MEMORY_DATABASE_URL: &str = "sqlite::memory:";

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    /// `None` keeps idle connections open forever.
    pub idle_timeout: Option<Duration>,
    /// `None` never recycles a connection.
    pub max_lifetime: Option<Duration>,
    pub busy_timeout: Duration,
    /// Use write-ahead logging. Ignored by SQLite for in-memory databases.
    pub wal: bool,
    /// Create the database file on first connect.
    pub create_if_missing: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: 1,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(1800)),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            wal: true,
            create_if_missing: true,
        }
    }
}

impl PoolConfig {
    /// One connection that is never closed, so the database outlives idle periods.
    pub fn in_memory() -> Self {
        Self {
            max_connections: 1,
            min_connections: 1,
            idle_timeout: None,
            max_lifetime: None,
            wal: false,
            ..Self::default()
        }
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn wal(mut self, enabled: bool) -> Self {
        self.wal = enabled;
        self
    }

    fn connect_options(&self, database_url: &str) -> Result<SqliteConnectOptions> {
        let journal_mode = if self.wal {
            SqliteJournalMode::Wal
        } else {
            SqliteJournalMode::Delete
        };
        Ok(SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(self.create_if_missing)
            .journal_mode(journal_mode)
            .busy_timeout(self.busy_timeout)
            .foreign_keys(true))
    }
}

/// Open a pool with the default configuration.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    create_pool_with_config(database_url, PoolConfig::default()).await
}

/// Open a pool over a fresh, private in-memory database.
pub async fn create_memory_pool() -> Result<SqlitePool> {
    create_pool_with_config(MEMORY_DATABASE_URL, PoolConfig::in_memory()).await
}

pub async fn create_pool_with_config(database_url: &str, config: PoolConfig) -> Result<SqlitePool> {
    let start = Instant::now();
    let options = config.connect_options(database_url)?;

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect_with(options)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "database",
        component = "pool",
        op = "create",
        max_connections = config.max_connections,
        wal = config.wal,
        duration_ms = start.elapsed().as_millis() as u64,
        "Database pool ready"
    );
    Ok(pool)
}

/// Log pool occupancy, warning when every connection is checked out.
pub fn log_pool_metrics(pool: &SqlitePool) {
    let size = pool.size();
    let idle = pool.num_idle();

    debug!(subsystem = "database", component = "pool", pool_size = size, pool_idle = idle, "Pool metrics");
    if size > 0 && idle == 0 {
        warn!(subsystem = "database", component = "pool", pool_size = size, "No idle database connections");
    }
}
