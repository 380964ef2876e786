//! In-memory collaborators for commune correction tests.
//!
//! This crate provides fakes for the `zone-core` traits:
//! - `InMemoryRecordStore` - Record store with failure injection and a write log
//! - `StaticNameProvider` / `UnavailableNameProvider` - Canonical name sources
//! - `InMemoryCursorStore` - Resume cursor storage
//! - `DelayedStore` - Wraps another store with artificial latency
//!
//! For production use, see the SQLite-backed adapters in the `corrector` crate.
//!
//! # Example
//!
//! ```rust
//! use mock_store::{InMemoryRecordStore, RecordStore, ZoneRecord};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_store::StoreError> {
//!     let store = InMemoryRecordStore::new([
//!         ZoneRecord::new(1, "cocody"),
//!         ZoneRecord::new(2, "Plateau"),
//!     ]);
//!
//!     let page = store.fetch_page(None, 10).await?;
//!     assert_eq!(page.len(), 2);
//!     Ok(())
//! }
//! ```

mod cursor;
mod delayed;
mod provider;
mod store;

// Re-export zone-core types for convenience
pub use zone_core::{
    async_trait, CanonicalNameProvider, CommuneUpdate, CursorStore, ProviderError, RecordId,
    RecordStore, StoreError, ZoneRecord,
};

// Export fakes
pub use cursor::InMemoryCursorStore;
pub use delayed::DelayedStore;
pub use provider::{StaticNameProvider, UnavailableNameProvider};
pub use store::InMemoryRecordStore;
