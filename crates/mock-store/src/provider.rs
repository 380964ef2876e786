//! Canonical name providers for tests.

use zone_core::{async_trait, CanonicalNameProvider, ProviderError};

/// A provider returning a fixed list of names.
#[derive(Debug, Clone, Default)]
pub struct StaticNameProvider {
    names: Vec<String>,
}

impl StaticNameProvider {
    /// Create a provider with the given names, in order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mock_store::StaticNameProvider;
    ///
    /// let provider = StaticNameProvider::new(["COCODY", "PLATEAU", "MARCORY"]);
    /// ```
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl CanonicalNameProvider for StaticNameProvider {
    async fn canonical_names(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self.names.clone())
    }

    fn name(&self) -> &str {
        "StaticNameProvider"
    }
}

/// A provider that always fails, simulating an unreachable registry source.
#[derive(Debug, Clone)]
pub struct UnavailableNameProvider {
    reason: String,
}

impl UnavailableNameProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableNameProvider {
    fn default() -> Self {
        Self::new("registry source offline")
    }
}

#[async_trait]
impl CanonicalNameProvider for UnavailableNameProvider {
    async fn canonical_names(&self) -> Result<Vec<String>, ProviderError> {
        Err(ProviderError::Unavailable(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "UnavailableNameProvider"
    }
}
