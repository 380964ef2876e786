//! Batch commune correction over persisted zone records.
//!
//! This crate provides the [`BatchCorrector`] type which reads zone records
//! page by page, resolves each commune against the canonical registry and
//! rewrites the records that have exactly one canonical match.
//!
//! # Features
//!
//! - Tiered resolution (exact, normalized, containment) from `zone-core`
//! - One atomic commit per page; a rejected page changes nothing
//! - Unmatched and ambiguous values are reported, never guessed
//! - Dry-run mode and resumable runs via a persisted cursor
//! - Cancellation at page boundaries
//!
//! # Architecture
//!
//! ```text
//! CanonicalNameProvider ──► CanonicalRegistry (built once, read-only)
//!                                   │
//! RecordStore::fetch_page ──► resolve each record (rayon for large pages)
//!                                   │
//!          ┌────────────┬───────────┼─────────────┬──────────────┐
//!       skipped     unchanged    matched       unmatched      ambiguous
//!                                   │              └──── report ─┘
//!                   RecordStore::apply_updates (one transaction per page)
//!                                   │
//!                     CursorStore::save_cursor (last committed id)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use corrector::{BatchCorrector, CorrectorConfig, SqliteNameProvider, SqliteRecordStore};
//! use database::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:data/communes.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let corrector = BatchCorrector::new(
//!         SqliteNameProvider::new(db.clone()),
//!         SqliteRecordStore::new(db),
//!         CorrectorConfig::from_env(),
//!     );
//!
//!     let report = corrector.run().await?;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

mod config;
mod corrector;
mod error;
mod file_provider;
mod report;
mod sqlite;

pub use config::{
    CorrectorConfig, DEFAULT_BATCH_SIZE, DEFAULT_JOB_NAME, DEFAULT_PARALLEL_THRESHOLD,
    DEFAULT_REPORT_LIMIT,
};
pub use corrector::BatchCorrector;
pub use error::CorrectorError;
pub use file_provider::{parse_registry, FileNameProvider};
pub use report::{AmbiguousEntry, ChangeEntry, CorrectionReport, FailedEntry, UnmatchedEntry};
pub use sqlite::{SqliteCursorStore, SqliteNameProvider, SqliteRecordStore};

// Re-export core types for callers that only depend on this crate
pub use zone_core::{
    normalize, resolve, CanonicalNameProvider, CanonicalRegistry, CursorStore, MatchTier,
    RecordId, RecordStore, RegistryError, ResolutionOutcome, StoreError, ZoneRecord,
};
