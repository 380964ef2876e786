//! Record projections exchanged with the record store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, totally ordered identifier of a persisted zone record.
///
/// Paging is keyset-based on this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId(id)
    }
}

/// The `{id, commune}` projection of a persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub id: RecordId,
    /// Raw commune text as entered. `None` when the column is NULL.
    pub commune: Option<String>,
}

impl ZoneRecord {
    pub fn new(id: i64, commune: impl Into<String>) -> Self {
        Self {
            id: RecordId(id),
            commune: Some(commune.into()),
        }
    }

    /// A record whose commune column is NULL.
    pub fn without_commune(id: i64) -> Self {
        Self {
            id: RecordId(id),
            commune: None,
        }
    }
}

/// A single commune-only write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommuneUpdate {
    pub id: RecordId,
    /// Value before the update, kept for failure reporting.
    pub previous: Option<String>,
    /// Canonical value to write.
    pub commune: String,
}
