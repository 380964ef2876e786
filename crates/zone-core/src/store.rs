//! Collaborator interfaces for the correction engine.
//!
//! All three traits are object-safe and can be used with `Box<dyn ...>` or
//! `Arc<dyn ...>`, so tests can substitute in-memory fakes.

use async_trait::async_trait;

use crate::error::{ProviderError, StoreError};
use crate::record::{CommuneUpdate, RecordId, ZoneRecord};

/// A source of canonical zone names.
#[async_trait]
pub trait CanonicalNameProvider: Send + Sync {
    /// Return the canonical names in a stable order.
    async fn canonical_names(&self) -> Result<Vec<String>, ProviderError>;

    /// Human-readable provider name for logs.
    fn name(&self) -> &str;
}

/// Paged access to persisted zone records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch up to `limit` records with an id strictly greater than `after`,
    /// in ascending id order.
    async fn fetch_page(
        &self,
        after: Option<RecordId>,
        limit: usize,
    ) -> Result<Vec<ZoneRecord>, StoreError>;

    /// Write the commune column of every update as one atomic unit.
    ///
    /// Either all updates commit or none do. Implementations must not touch
    /// any other column.
    async fn apply_updates(&self, updates: &[CommuneUpdate]) -> Result<(), StoreError>;

    /// Human-readable store name for logs.
    fn name(&self) -> &str;
}

/// Persistence for the resume position of a named correction job.
#[async_trait]
pub trait CursorStore: Send + Sync {
    /// Last committed record id, if a previous run was interrupted.
    async fn load_cursor(&self, job: &str) -> Result<Option<RecordId>, StoreError>;

    async fn save_cursor(&self, job: &str, last_id: RecordId) -> Result<(), StoreError>;

    /// Forget the cursor once a run completes.
    async fn clear_cursor(&self, job: &str) -> Result<(), StoreError>;
}
