//! Canonical zone name storage.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};

/// List canonical zone names in registry order.
pub async fn list_canonical_names(pool: &SqlitePool) -> Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        SELECT name
        FROM canonical_zones
        ORDER BY position
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(names)
}

/// Replace the whole registry with `names`, keeping their order.
///
/// Runs in one transaction: a duplicate name leaves the previous registry intact.
pub async fn replace_canonical_names<S: AsRef<str>>(pool: &SqlitePool, names: &[S]) -> Result<u64> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM canonical_zones
        "#,
    )
    .execute(&mut *tx)
    .await?;

    for (position, name) in names.iter().enumerate() {
        let name = name.as_ref();
        sqlx::query(
            r#"
            INSERT INTO canonical_zones (position, name)
            VALUES (?, ?)
            "#,
        )
        .bind(position as i64)
        .bind(name)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return DatabaseError::AlreadyExists {
                        entity: "CanonicalZone",
                        id: name.to_string(),
                    };
                }
            }
            DatabaseError::Sqlx(e)
        })?;
    }

    tx.commit().await?;

    tracing::info!("Stored {} canonical zone names", names.len());
    Ok(names.len() as u64)
}
