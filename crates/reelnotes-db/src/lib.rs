//! # reelnotes-db
//!
//! SQLite note store for reelnotes.
//!
//! This crate provides:
//! - Connection pool management (file-backed or in-memory)
//! - Embedded schema migrations
//! - [`SqliteNoteRepository`], the [`NoteRepository`] implementation
//!
//! ## Example
//!
//! ```rust,no_run
//! use reelnotes_db::{CreateNoteRequest, Database, NoteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite://reelnotes.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let id = db.notes.insert(CreateNoteRequest::manual(None)).await?;
//!     println!("Created note: {}", id);
//!     Ok(())
//! }
//! ```

pub mod notes;
pub mod pool;

// Re-export core types
pub use reelnotes_core::*;

pub use notes::SqliteNoteRepository;
pub use pool::{
    create_memory_pool, create_pool, create_pool_with_config, log_pool_metrics, PoolConfig,
    MEMORY_DATABASE_URL,
};

/// Combined database context.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::SqlitePool,
    /// Note repository for CRUD operations.
    pub notes: SqliteNoteRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            notes: SqliteNoteRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to a database URL with the default pool configuration.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Fresh in-memory database with the schema applied.
    #[cfg(feature = "migrations")]
    pub async fn in_memory() -> Result<Self> {
        let db = Self::new(create_memory_pool().await?);
        db.migrate().await?;
        Ok(db)
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
    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}
