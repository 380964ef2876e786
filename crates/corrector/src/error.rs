//! Error types for correction runs.

use thiserror::Error;
use zone_core::{RegistryError, StoreError};

/// Errors that abort a correction run.
///
/// Per-record update failures are not errors at this level; they are
/// collected in the report.
#[derive(Debug, Error)]
pub enum CorrectorError {
    /// The canonical registry could not be built. No record was touched.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A page could not be read, or the resume cursor could not be loaded.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Invalid corrector settings.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
