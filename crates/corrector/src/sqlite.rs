//! SQLite-backed collaborators built on the `database` crate.

use database::{canonical_zone, correction_cursor, zone_record, Database, DatabaseError};
use zone_core::{
    async_trait, CanonicalNameProvider, CommuneUpdate, CursorStore, ProviderError, RecordId,
    RecordStore, StoreError, ZoneRecord,
};

/// Record store over the `zone_records` table.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    database: Database,
}

impl SqliteRecordStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn fetch_page(
        &self,
        after: Option<RecordId>,
        limit: usize,
    ) -> Result<Vec<ZoneRecord>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = zone_record::list_page(self.database.pool(), after.map(|id| id.0), limit)
            .await
            .map_err(|e| {
                if e.is_connection() {
                    StoreError::Unavailable(e.to_string())
                } else {
                    StoreError::Read(e.to_string())
                }
            })?;

        Ok(rows
            .into_iter()
            .map(|row| ZoneRecord {
                id: RecordId(row.id),
                commune: row.commune,
            })
            .collect())
    }

    async fn apply_updates(&self, updates: &[CommuneUpdate]) -> Result<(), StoreError> {
        let writes: Vec<(i64, &str)> = updates
            .iter()
            .map(|update| (update.id.0, update.commune.as_str()))
            .collect();

        zone_record::update_communes(self.database.pool(), &writes)
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound { id, .. } => StoreError::Update {
                    id: RecordId(id),
                    reason: e.to_string(),
                },
                other => StoreError::Commit(other.to_string()),
            })
    }

    fn name(&self) -> &str {
        "SqliteRecordStore"
    }
}

/// Canonical names from the `canonical_zones` table.
#[derive(Debug, Clone)]
pub struct SqliteNameProvider {
    database: Database,
}

impl SqliteNameProvider {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl CanonicalNameProvider for SqliteNameProvider {
    async fn canonical_names(&self) -> Result<Vec<String>, ProviderError> {
        canonical_zone::list_canonical_names(self.database.pool())
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))
    }

    fn name(&self) -> &str {
        "SqliteNameProvider"
    }
}

/// Resume cursors in the `correction_cursors` table.
#[derive(Debug, Clone)]
pub struct SqliteCursorStore {
    database: Database,
}

impl SqliteCursorStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl CursorStore for SqliteCursorStore {
    async fn load_cursor(&self, job: &str) -> Result<Option<RecordId>, StoreError> {
        let cursor = correction_cursor::get_cursor(self.database.pool(), job)
            .await
            .map_err(|e| StoreError::Cursor(e.to_string()))?;
        Ok(cursor.map(|c| RecordId(c.last_id)))
    }

    async fn save_cursor(&self, job: &str, last_id: RecordId) -> Result<(), StoreError> {
        correction_cursor::save_cursor(self.database.pool(), job, last_id.0)
            .await
            .map_err(|e| StoreError::Cursor(e.to_string()))
    }

    async fn clear_cursor(&self, job: &str) -> Result<(), StoreError> {
        correction_cursor::clear_cursor(self.database.pool(), job)
            .await
            .map_err(|e| StoreError::Cursor(e.to_string()))
    }
}
