//! The authoritative set of recognized zone names.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{ConfigurationError, RegistryError};
use crate::normalize::{normalize, NormalizedKey};
use crate::store::CanonicalNameProvider;

/// An immutable set of canonical zone names with precomputed lookup keys.
///
/// Iteration follows the order the provider supplied the names in. The
/// registry is read-only once built and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct CanonicalRegistry {
    names: Vec<String>,
    keys: Vec<NormalizedKey>,
    exact_upper: HashMap<String, usize>,
    normalized: HashMap<NormalizedKey, usize>,
}

impl CanonicalRegistry {
    /// Build a registry from an ordered list of names.
    ///
    /// Names are trimmed, blank entries are skipped and repeated names keep
    /// their first position. Two different names sharing a normalized key
    /// or the same uppercase form are rejected rather than merged.
    pub fn build<I, S>(names: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::default();

        for raw in names {
            let name = raw.as_ref().trim();
            if name.is_empty() {
                warn!("Ignoring blank canonical zone name");
                continue;
            }

            let key = normalize(name);
            if key.is_empty() {
                return Err(ConfigurationError::EmptyKey {
                    name: name.to_string(),
                });
            }

            if let Some(&existing) = registry.normalized.get(&key) {
                if registry.names[existing] == name {
                    debug!("Skipping repeated canonical zone name {}", name);
                    continue;
                }
                return Err(ConfigurationError::DuplicateKey {
                    key: key.to_string(),
                    first: registry.names[existing].clone(),
                    second: name.to_string(),
                });
            }

            let upper = name.to_uppercase();
            if let Some(&existing) = registry.exact_upper.get(&upper) {
                return Err(ConfigurationError::DuplicateUppercase {
                    upper,
                    first: registry.names[existing].clone(),
                    second: name.to_string(),
                });
            }

            let index = registry.names.len();
            registry.exact_upper.insert(upper, index);
            registry.normalized.insert(key.clone(), index);
            registry.keys.push(key);
            registry.names.push(name.to_string());
        }

        Ok(registry)
    }

    /// Fetch names from a provider and build the registry.
    ///
    /// A failing provider, or one that returns no usable names, makes the
    /// registry unavailable. Callers must abort the run in that case.
    pub async fn load<P>(provider: &P) -> Result<Self, RegistryError>
    where
        P: CanonicalNameProvider + ?Sized,
    {
        let names = provider.canonical_names().await?;
        let registry = Self::build(names)?;

        if registry.is_empty() {
            return Err(RegistryError::Unavailable(format!(
                "{} returned no canonical zone names",
                provider.name()
            )));
        }

        debug!(
            "Loaded {} canonical zone names from {}",
            registry.len(),
            provider.name()
        );
        Ok(registry)
    }

    /// Canonical names in provider order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether `name` is itself a canonical value (exact, case-sensitive).
    pub fn contains(&self, name: &str) -> bool {
        self.normalized
            .get(&normalize(name))
            .is_some_and(|&index| self.names[index] == name)
    }

    /// Tier-1 lookup: the canonical name whose uppercase form equals `upper`.
    pub fn exact_upper(&self, upper: &str) -> Option<&str> {
        self.exact_upper
            .get(upper)
            .map(|&index| self.names[index].as_str())
    }

    /// Tier-2 lookup: the canonical name owning a normalized key.
    pub fn by_key(&self, key: &NormalizedKey) -> Option<&str> {
        self.normalized
            .get(key)
            .map(|&index| self.names[index].as_str())
    }

    /// Iterate `(key, canonical name)` pairs in provider order.
    pub fn entries(&self) -> impl Iterator<Item = (&NormalizedKey, &str)> {
        self.keys
            .iter()
            .zip(self.names.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use async_trait::async_trait;

    struct FixedProvider(Result<Vec<String>, String>);

    #[async_trait]
    impl CanonicalNameProvider for FixedProvider {
        async fn canonical_names(&self) -> Result<Vec<String>, ProviderError> {
            self.0.clone().map_err(ProviderError::Unavailable)
        }

        fn name(&self) -> &str {
            "FixedProvider"
        }
    }

    #[test]
    fn test_build_keeps_order() {
        let registry = CanonicalRegistry::build(["PLATEAU", "COCODY", "MARCORY"]).unwrap();
        assert_eq!(registry.names(), &["PLATEAU", "COCODY", "MARCORY"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_build_trims_and_dedups() {
        let registry = CanonicalRegistry::build([" COCODY ", "", "COCODY", "PLATEAU"]).unwrap();
        assert_eq!(registry.names(), &["COCODY", "PLATEAU"]);
    }

    #[test]
    fn test_lookups() {
        let registry = CanonicalRegistry::build(["ADJAMÉ", "PORT-BOUET"]).unwrap();
        assert_eq!(registry.exact_upper("ADJAMÉ"), Some("ADJAMÉ"));
        assert_eq!(registry.exact_upper("ADJAME"), None);
        assert_eq!(registry.by_key(&normalize("adjame")), Some("ADJAMÉ"));
        assert_eq!(registry.by_key(&normalize("Port Bouët")), Some("PORT-BOUET"));
        assert!(registry.contains("PORT-BOUET"));
        assert!(!registry.contains("Port-Bouet"));
    }

    #[test]
    fn test_colliding_names_rejected() {
        let err = CanonicalRegistry::build(["ADJAME", "ADJAMÉ"]).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DuplicateKey {
                key: "ADJAME".to_string(),
                first: "ADJAME".to_string(),
                second: "ADJAMÉ".to_string(),
            }
        );
    }

    #[test]
    fn test_case_variants_rejected() {
        let result = CanonicalRegistry::build(["COCODY", "Cocody"]);
        assert!(matches!(result, Err(ConfigurationError::DuplicateKey { .. })));
    }

    #[test]
    fn test_uppercase_collision_rejected() {
        // Distinct keys ("STRAE", "STRASSE") but both uppercase to "STRASSE"
        let err = CanonicalRegistry::build(["STRAßE", "STRASSE"]).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DuplicateUppercase {
                upper: "STRASSE".to_string(),
                first: "STRAßE".to_string(),
                second: "STRASSE".to_string(),
            }
        );
    }

    #[test]
    fn test_symbol_only_name_rejected() {
        let result = CanonicalRegistry::build(["COCODY", "---"]);
        assert!(matches!(result, Err(ConfigurationError::EmptyKey { .. })));
    }

    #[tokio::test]
    async fn test_load_from_provider() {
        let provider = FixedProvider(Ok(vec!["COCODY".to_string(), "PLATEAU".to_string()]));
        let registry = CanonicalRegistry::load(&provider).await.unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_load_unavailable() {
        let provider = FixedProvider(Err("connection refused".to_string()));
        let result = CanonicalRegistry::load(&provider).await;
        assert!(matches!(result, Err(RegistryError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_load_empty_is_unavailable() {
        let provider = FixedProvider(Ok(vec!["  ".to_string()]));
        let result = CanonicalRegistry::load(&provider).await;
        assert!(matches!(result, Err(RegistryError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_load_configuration_error() {
        let provider = FixedProvider(Ok(vec!["YOPOUGON".to_string(), "Yopougon".to_string()]));
        let result = CanonicalRegistry::load(&provider).await;
        assert!(matches!(result, Err(RegistryError::Configuration(_))));
    }
}
