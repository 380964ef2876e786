//! In-memory resume cursor storage.

use std::collections::HashMap;

use tokio::sync::RwLock;
use zone_core::{async_trait, CursorStore, RecordId, StoreError};

/// A cursor store backed by a map of job name to last committed id.
#[derive(Debug, Default)]
pub struct InMemoryCursorStore {
    cursors: RwLock<HashMap<String, RecordId>>,
}

impl InMemoryCursorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with an existing cursor for `job`.
    pub fn with_cursor(job: impl Into<String>, last_id: i64) -> Self {
        let mut cursors = HashMap::new();
        cursors.insert(job.into(), RecordId(last_id));
        Self {
            cursors: RwLock::new(cursors),
        }
    }

    /// Current cursor of `job`, if any.
    pub async fn get(&self, job: &str) -> Option<RecordId> {
        self.cursors.read().await.get(job).copied()
    }
}

#[async_trait]
impl CursorStore for InMemoryCursorStore {
    async fn load_cursor(&self, job: &str) -> Result<Option<RecordId>, StoreError> {
        Ok(self.get(job).await)
    }

    async fn save_cursor(&self, job: &str, last_id: RecordId) -> Result<(), StoreError> {
        self.cursors.write().await.insert(job.to_string(), last_id);
        Ok(())
    }

    async fn clear_cursor(&self, job: &str) -> Result<(), StoreError> {
        self.cursors.write().await.remove(job);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cursor_roundtrip() {
        let store = InMemoryCursorStore::new();
        assert_eq!(store.load_cursor("commune").await.unwrap(), None);

        store.save_cursor("commune", RecordId(7)).await.unwrap();
        assert_eq!(store.load_cursor("commune").await.unwrap(), Some(RecordId(7)));

        store.clear_cursor("commune").await.unwrap();
        assert_eq!(store.get("commune").await, None);
    }

    #[tokio::test]
    async fn test_with_cursor() {
        let store = InMemoryCursorStore::with_cursor("commune", 12);
        assert_eq!(store.get("commune").await, Some(RecordId(12)));
        assert_eq!(store.get("other").await, None);
    }
}
