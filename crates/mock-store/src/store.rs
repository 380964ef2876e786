//! In-memory record store with failure injection.

use std::collections::{BTreeMap, HashSet};

use tokio::sync::Mutex;
use zone_core::{async_trait, CommuneUpdate, RecordId, RecordStore, StoreError, ZoneRecord};

#[derive(Debug, Default)]
struct State {
    records: BTreeMap<RecordId, Option<String>>,
    committed: Vec<CommuneUpdate>,
    fetch_calls: usize,
    apply_calls: usize,
}

/// A record store backed by an ordered map.
///
/// Updates are applied all-or-nothing. Every committed update is kept in a
/// log so tests can assert exactly which writes happened.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    state: Mutex<State>,
    failing_ids: HashSet<RecordId>,
    fail_reads_after: Option<usize>,
}

impl InMemoryRecordStore {
    /// Create a store holding the given records.
    pub fn new(records: impl IntoIterator<Item = ZoneRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id, record.commune))
            .collect();

        Self {
            state: Mutex::new(State {
                records,
                ..State::default()
            }),
            ..Self::default()
        }
    }

    /// Reject any batch containing an update for `id`.
    ///
    /// The whole batch is rolled back, mirroring a failed transaction.
    pub fn fail_updates_for(mut self, id: i64) -> Self {
        self.failing_ids.insert(RecordId(id));
        self
    }

    /// Let the first `pages` page reads succeed and fail every later one.
    pub fn fail_reads_after(mut self, pages: usize) -> Self {
        self.fail_reads_after = Some(pages);
        self
    }

    /// Current commune of a record.
    pub async fn commune(&self, id: i64) -> Option<String> {
        let state = self.state.lock().await;
        state.records.get(&RecordId(id)).cloned().flatten()
    }

    /// All records in id order.
    pub async fn snapshot(&self) -> Vec<ZoneRecord> {
        let state = self.state.lock().await;
        state
            .records
            .iter()
            .map(|(id, commune)| ZoneRecord {
                id: *id,
                commune: commune.clone(),
            })
            .collect()
    }

    /// Every update that committed, in commit order.
    pub async fn committed_updates(&self) -> Vec<CommuneUpdate> {
        self.state.lock().await.committed.clone()
    }

    /// Number of `apply_updates` calls, successful or not.
    pub async fn apply_calls(&self) -> usize {
        self.state.lock().await.apply_calls
    }

    /// Number of `fetch_page` calls, successful or not.
    pub async fn fetch_calls(&self) -> usize {
        self.state.lock().await.fetch_calls
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch_page(
        &self,
        after: Option<RecordId>,
        limit: usize,
    ) -> Result<Vec<ZoneRecord>, StoreError> {
        let mut state = self.state.lock().await;
        state.fetch_calls += 1;

        if let Some(allowed) = self.fail_reads_after {
            if state.fetch_calls > allowed {
                return Err(StoreError::Read(format!(
                    "injected read failure on page {}",
                    state.fetch_calls
                )));
            }
        }

        let page = state
            .records
            .iter()
            .filter(|(id, _)| after.map_or(true, |after| **id > after))
            .take(limit)
            .map(|(id, commune)| ZoneRecord {
                id: *id,
                commune: commune.clone(),
            })
            .collect();

        Ok(page)
    }

    async fn apply_updates(&self, updates: &[CommuneUpdate]) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.apply_calls += 1;

        // Validate the whole batch before touching anything.
        for update in updates {
            if self.failing_ids.contains(&update.id) {
                return Err(StoreError::Update {
                    id: update.id,
                    reason: "injected update failure".to_string(),
                });
            }
            if !state.records.contains_key(&update.id) {
                return Err(StoreError::Update {
                    id: update.id,
                    reason: "record not found".to_string(),
                });
            }
        }

        for update in updates {
            state
                .records
                .insert(update.id, Some(update.commune.clone()));
            state.committed.push(update.clone());
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "InMemoryRecordStore"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(id: i64, commune: &str) -> CommuneUpdate {
        CommuneUpdate {
            id: RecordId(id),
            previous: None,
            commune: commune.to_string(),
        }
    }

    fn store() -> InMemoryRecordStore {
        InMemoryRecordStore::new([
            ZoneRecord::new(3, "plateau"),
            ZoneRecord::new(1, "cocody"),
            ZoneRecord::without_commune(2),
        ])
    }

    #[tokio::test]
    async fn test_pages_in_id_order() {
        let store = store();

        let first = store.fetch_page(None, 2).await.unwrap();
        assert_eq!(first.iter().map(|r| r.id.0).collect::<Vec<_>>(), vec![1, 2]);

        let second = store.fetch_page(Some(RecordId(2)), 2).await.unwrap();
        assert_eq!(second, vec![ZoneRecord::new(3, "plateau")]);

        assert!(store.fetch_page(Some(RecordId(3)), 2).await.unwrap().is_empty());
        assert_eq!(store.fetch_calls().await, 3);
    }

    #[tokio::test]
    async fn test_apply_updates() {
        let store = store();
        store
            .apply_updates(&[update(1, "COCODY"), update(3, "PLATEAU")])
            .await
            .unwrap();

        assert_eq!(store.commune(1).await.as_deref(), Some("COCODY"));
        assert_eq!(store.commune(3).await.as_deref(), Some("PLATEAU"));
        assert_eq!(store.committed_updates().await.len(), 2);
    }

    #[tokio::test]
    async fn test_injected_failure_rolls_back_batch() {
        let store = store().fail_updates_for(3);

        let result = store
            .apply_updates(&[update(1, "COCODY"), update(3, "PLATEAU")])
            .await;
        assert!(matches!(result, Err(StoreError::Update { id: RecordId(3), .. })));

        assert_eq!(store.commune(1).await.as_deref(), Some("cocody"));
        assert!(store.committed_updates().await.is_empty());
        assert_eq!(store.apply_calls().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_record_rejected() {
        let store = store();
        let result = store.apply_updates(&[update(42, "COCODY")]).await;
        assert!(matches!(result, Err(StoreError::Update { .. })));
    }

    #[tokio::test]
    async fn test_injected_read_failure() {
        let store = store().fail_reads_after(1);
        assert!(store.fetch_page(None, 1).await.is_ok());
        assert!(matches!(
            store.fetch_page(Some(RecordId(1)), 1).await,
            Err(StoreError::Read(_))
        ));
    }
}
