//! SQLite persistence layer for commune correction.
//!
//! This crate provides async database operations for zone records, the
//! canonical zone registry and correction resume cursors using SQLx with
//! SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, canonical_zone, zone_record};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:communes.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Seed the registry and one record
//!     canonical_zone::replace_canonical_names(db.pool(), &["COCODY", "PLATEAU"]).await?;
//!     zone_record::insert_record(db.pool(), Some("cocody"), "DLV-0001").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod canonical_zone;
pub mod correction_cursor;
pub mod error;
pub mod models;
pub mod zone_record;

pub use error::{DatabaseError, Result};
pub use models::{CommuneRow, CorrectionCursor, ZoneRecordRow};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Shared handle to the correction database.
///
/// Cloning is cheap; all clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// The corrector is a single writer, so a small pool is enough.
    const DEFAULT_POOL_SIZE: u32 = 4;

    /// Open a pool on a `sqlite:` URL, creating the file when missing.
    ///
    /// Plain paths go through [`sqlite_url_from_path`] first.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/communes.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Like [`Database::connect`] with an explicit connection limit.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Opened correction database {} ({} connections)",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Connect to a private in-memory database with migrations applied.
    ///
    /// Uses a single connection so every query sees the same database.
    pub async fn in_memory() -> Result<Self> {
        let db = Self::connect_with_pool_size("sqlite::memory:", 1).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Create or upgrade the zone record, registry and cursor tables.
    pub async fn migrate(&self) -> Result<()> {
        tracing::debug!("Applying correction schema migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Correction schema up to date");
        Ok(())
    }

    /// The underlying pool, for the query modules.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every connection of the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Turn a filesystem path into a SQLite URL; URLs pass through unchanged.
pub fn sqlite_url_from_path(path: &str) -> String {
    if path.starts_with("sqlite:") {
        path.to_string()
    } else {
        format!("sqlite:{}?mode=rwc", path)
    }
}
