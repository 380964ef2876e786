//! Core types and matching logic for commune correction.
//!
//! This crate provides the pure part of the correction engine and the
//! interfaces of its collaborators:
//!
//! - [`normalize`] - Accent, punctuation and case folding into a [`NormalizedKey`]
//! - [`CanonicalRegistry`] - The authoritative set of recognized zone names
//! - [`resolve`] - Tiered matching of one raw value into a [`ResolutionOutcome`]
//! - [`RecordStore`] / [`CanonicalNameProvider`] / [`CursorStore`] - Traits for
//!   the persistence collaborators
//!
//! # Example
//!
//! ```rust
//! use zone_core::{resolve, CanonicalRegistry, ResolutionOutcome};
//!
//! let registry = CanonicalRegistry::build(["COCODY", "PLATEAU", "MARCORY"]).unwrap();
//!
//! let outcome = resolve(Some("Abidjan-Cocody"), &registry);
//! assert_eq!(outcome.canonical(), Some("COCODY"));
//!
//! assert_eq!(resolve(Some("   "), &registry), ResolutionOutcome::Skipped);
//! ```

mod error;
mod normalize;
mod record;
mod registry;
mod resolver;
mod store;

pub use error::{ConfigurationError, ProviderError, RegistryError, StoreError};
pub use normalize::{normalize, NormalizedKey};
pub use record::{CommuneUpdate, RecordId, ZoneRecord};
pub use registry::CanonicalRegistry;
pub use resolver::{resolve, MatchTier, ResolutionOutcome};
pub use store::{CanonicalNameProvider, CursorStore, RecordStore};

// Re-export async_trait for implementors
pub use async_trait::async_trait;
