//! Delayed store - wraps another record store with artificial latency.

use std::time::Duration;

use tokio::time::sleep;
use zone_core::{async_trait, CommuneUpdate, RecordId, RecordStore, StoreError, ZoneRecord};

/// A record store that wraps another store and delays every page read.
///
/// Useful for testing cancellation between pages.
pub struct DelayedStore<S: RecordStore> {
    inner: S,
    delay: Duration,
}

impl<S: RecordStore> DelayedStore<S> {
    /// Create a new DelayedStore wrapping the given store with the specified delay.
    pub fn new(inner: S, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a store with a delay in milliseconds.
    pub fn with_millis(inner: S, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// Access the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: RecordStore> RecordStore for DelayedStore<S> {
    async fn fetch_page(
        &self,
        after: Option<RecordId>,
        limit: usize,
    ) -> Result<Vec<ZoneRecord>, StoreError> {
        sleep(self.delay).await;
        self.inner.fetch_page(after, limit).await
    }

    async fn apply_updates(&self, updates: &[CommuneUpdate]) -> Result<(), StoreError> {
        self.inner.apply_updates(updates).await
    }

    fn name(&self) -> &str {
        "DelayedStore"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryRecordStore;
    use std::time::Instant;

    #[tokio::test]
    async fn test_delayed_store() {
        let inner = InMemoryRecordStore::new([ZoneRecord::new(1, "cocody")]);
        let store = DelayedStore::with_millis(inner, 50);

        let start = Instant::now();
        let page = store.fetch_page(None, 10).await.unwrap();
        let elapsed = start.elapsed();

        assert_eq!(page.len(), 1);
        assert!(elapsed >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_store_name() {
        let store = DelayedStore::with_millis(InMemoryRecordStore::default(), 0);
        assert_eq!(store.name(), "DelayedStore");
        assert_eq!(store.inner().name(), "InMemoryRecordStore");
    }
}
