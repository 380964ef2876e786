//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted zone record (e.g. a delivery address block).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ZoneRecordRow {
    /// Auto-incrementing ID; also the paging key.
    pub id: i64,
    /// Free-text commune as entered by a user or driver.
    pub commune: Option<String>,
    /// External reference owned by the application (never touched by corrections).
    pub reference: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// The `{id, commune}` projection read by the corrector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CommuneRow {
    pub id: i64,
    pub commune: Option<String>,
}

/// Resume position of a correction job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CorrectionCursor {
    /// Job name (e.g. "commune").
    pub job: String,
    /// Last record id whose page committed.
    pub last_id: i64,
    /// Last update timestamp.
    pub updated_at: String,
}
