//! Resume cursors for interrupted correction runs.

use sqlx::SqlitePool;

use crate::models::CorrectionCursor;
use crate::Result;

/// Create or move the cursor of a job.
pub async fn save_cursor(pool: &SqlitePool, job: &str, last_id: i64) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO correction_cursors (job, last_id)
        VALUES (?, ?)
        ON CONFLICT(job) DO UPDATE SET
            last_id = excluded.last_id,
            updated_at = datetime('now')
        "#,
    )
    .bind(job)
    .bind(last_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the cursor of a job.
pub async fn get_cursor(pool: &SqlitePool, job: &str) -> Result<Option<CorrectionCursor>> {
    let cursor = sqlx::query_as::<_, CorrectionCursor>(
        r#"
        SELECT job, last_id, updated_at
        FROM correction_cursors
        WHERE job = ?
        "#,
    )
    .bind(job)
    .fetch_optional(pool)
    .await?;

    Ok(cursor)
}

/// Remove the cursor of a job.
pub async fn clear_cursor(pool: &SqlitePool, job: &str) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM correction_cursors
        WHERE job = ?
        "#,
    )
    .bind(job)
    .execute(pool)
    .await?;

    Ok(())
}
