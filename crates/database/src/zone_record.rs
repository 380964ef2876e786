//! Zone record reads and commune-only writes.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{CommuneRow, ZoneRecordRow};

/// Insert a new zone record and return its id.
pub async fn insert_record(
    pool: &SqlitePool,
    commune: Option<&str>,
    reference: &str,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO zone_records (commune, reference)
        VALUES (?, ?)
        "#,
    )
    .bind(commune)
    .bind(reference)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Get a zone record by ID.
pub async fn get_record(pool: &SqlitePool, id: i64) -> Result<ZoneRecordRow> {
    sqlx::query_as::<_, ZoneRecordRow>(
        r#"
        SELECT id, commune, reference, created_at
        FROM zone_records
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "ZoneRecord",
        id,
    })
}

/// List the next page of `{id, commune}` projections after `after`.
///
/// Keyset pagination on the primary key, so pages are stable while earlier
/// pages are being rewritten.
pub async fn list_page(
    pool: &SqlitePool,
    after: Option<i64>,
    limit: i64,
) -> Result<Vec<CommuneRow>> {
    let rows = sqlx::query_as::<_, CommuneRow>(
        r#"
        SELECT id, commune
        FROM zone_records
        WHERE id > ?
        ORDER BY id
        LIMIT ?
        "#,
    )
    .bind(after.unwrap_or(i64::MIN))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Write the commune column of several records in one transaction.
///
/// Any missing record or failing statement rolls back the whole batch.
pub async fn update_communes(pool: &SqlitePool, updates: &[(i64, &str)]) -> Result<()> {
    if updates.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    for (id, commune) in updates {
        let result = sqlx::query(
            r#"
            UPDATE zone_records
            SET commune = ?
            WHERE id = ?
            "#,
        )
        .bind(*commune)
        .bind(*id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls it back.
            return Err(DatabaseError::NotFound {
                entity: "ZoneRecord",
                id: *id,
            });
        }
    }

    tx.commit().await?;
    Ok(())
}

/// Count total zone records.
pub async fn count_records(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM zone_records
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[tokio::test]
    async fn test_list_page_keyset() {
        let db = Database::in_memory().await.unwrap();
        for commune in ["a", "b", "c", "d", "e"] {
            insert_record(db.pool(), Some(commune), "").await.unwrap();
        }

        let first = list_page(db.pool(), None, 2).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].commune.as_deref(), Some("a"));

        let second = list_page(db.pool(), Some(first[1].id), 2).await.unwrap();
        assert_eq!(second[0].commune.as_deref(), Some("c"));

        let last = list_page(db.pool(), Some(second[1].id), 10).await.unwrap();
        assert_eq!(last.len(), 1);
        assert!(list_page(db.pool(), Some(last[0].id), 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_null_commune_roundtrip() {
        let db = Database::in_memory().await.unwrap();
        let id = insert_record(db.pool(), None, "DLV-9").await.unwrap();
        let rows = list_page(db.pool(), None, 10).await.unwrap();
        assert_eq!(rows, vec![CommuneRow { id, commune: None }]);
    }

    #[tokio::test]
    async fn test_update_leaves_other_columns() {
        let db = Database::in_memory().await.unwrap();
        let id = insert_record(db.pool(), Some("cocody"), "DLV-42").await.unwrap();
        let before = get_record(db.pool(), id).await.unwrap();

        update_communes(db.pool(), &[(id, "COCODY")]).await.unwrap();

        let after = get_record(db.pool(), id).await.unwrap();
        assert_eq!(after.commune.as_deref(), Some("COCODY"));
        assert_eq!(after.reference, before.reference);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn test_update_rolls_back_on_missing_record() {
        let db = Database::in_memory().await.unwrap();
        let first = insert_record(db.pool(), Some("cocody"), "").await.unwrap();
        let second = insert_record(db.pool(), Some("plateau"), "").await.unwrap();

        let result = update_communes(
            db.pool(),
            &[(first, "COCODY"), (9999, "MARCORY"), (second, "PLATEAU")],
        )
        .await;
        assert!(matches!(result, Err(DatabaseError::NotFound { id: 9999, .. })));

        let first = get_record(db.pool(), first).await.unwrap();
        let second = get_record(db.pool(), second).await.unwrap();
        assert_eq!(first.commune.as_deref(), Some("cocody"));
        assert_eq!(second.commune.as_deref(), Some("plateau"));
    }

    #[tokio::test]
    async fn test_counts() {
        let db = Database::in_memory().await.unwrap();
        insert_record(db.pool(), Some("COCODY"), "").await.unwrap();
        insert_record(db.pool(), Some("COCODY"), "").await.unwrap();
        insert_record(db.pool(), None, "").await.unwrap();

        assert_eq!(count_records(db.pool()).await.unwrap(), 3);
    }
}
