//! Error types for registry construction and record persistence.

use thiserror::Error;

use crate::record::RecordId;

/// The canonical name list cannot form a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Two distinct canonical names collapse to the same normalized key.
    #[error("canonical names {first:?} and {second:?} share normalized key {key:?}")]
    DuplicateKey {
        key: String,
        first: String,
        second: String,
    },

    /// Two distinct canonical names have the same uppercase form.
    #[error("canonical names {first:?} and {second:?} share uppercase form {upper:?}")]
    DuplicateUppercase {
        upper: String,
        first: String,
        second: String,
    },

    /// A canonical name has no alphanumeric characters left after normalization.
    #[error("canonical name {name:?} normalizes to an empty key")]
    EmptyKey { name: String },
}

/// Errors raised while building the canonical registry.
///
/// Both variants are fatal to a correction run and surface before any
/// record is read.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The canonical name list is inconsistent.
    #[error("registry configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The canonical name provider could not supply any data.
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by a canonical name provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backing source is unreachable or refused the request.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Reading a registry file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ProviderError> for RegistryError {
    fn from(err: ProviderError) -> Self {
        RegistryError::Unavailable(err.to_string())
    }
}

/// Errors returned by a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store cannot be reached at all.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// A page of records could not be read.
    #[error("failed to read records: {0}")]
    Read(String),

    /// A single update was rejected; the enclosing page was rolled back.
    #[error("update of record {id} rejected: {reason}")]
    Update { id: RecordId, reason: String },

    /// The page transaction failed to commit.
    #[error("failed to commit page: {0}")]
    Commit(String),

    /// The resume cursor could not be read or written.
    #[error("cursor error: {0}")]
    Cursor(String),
}
