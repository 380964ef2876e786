//! Tiered resolution of raw commune text against the registry.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::normalize::normalize;
use crate::registry::CanonicalRegistry;

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// Uppercased input equals a canonical name.
    ExactCase,
    /// Normalized input equals a canonical key.
    Normalized,
    /// Exactly one canonical key is contained in, or contains, the input key.
    Containment,
}

/// Classification of one raw value.
///
/// Depends only on the raw value and the registry contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// Input was missing or blank.
    Skipped,
    /// Input resolved to exactly one canonical name.
    Matched { canonical: String, tier: MatchTier },
    /// Input is compatible with several canonical names; needs review.
    Ambiguous { candidates: BTreeSet<String> },
    /// No canonical name is compatible with the input.
    Unmatched,
}

impl ResolutionOutcome {
    /// The matched canonical name, if any.
    pub fn canonical(&self) -> Option<&str> {
        match self {
            ResolutionOutcome::Matched { canonical, .. } => Some(canonical),
            _ => None,
        }
    }

    pub fn tier(&self) -> Option<MatchTier> {
        match self {
            ResolutionOutcome::Matched { tier, .. } => Some(*tier),
            _ => None,
        }
    }

    /// Short label used in logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionOutcome::Skipped => "skipped",
            ResolutionOutcome::Matched { .. } => "matched",
            ResolutionOutcome::Ambiguous { .. } => "ambiguous",
            ResolutionOutcome::Unmatched => "unmatched",
        }
    }
}

/// Resolve a raw commune value.
///
/// Tiers are tried in order and the first success wins:
///
/// 1. blank input is skipped
/// 2. uppercase exact match
/// 3. normalized exact match
/// 4. substring containment in either direction between normalized keys;
///    one candidate matches, several are ambiguous, none is unmatched
pub fn resolve(raw: Option<&str>, registry: &CanonicalRegistry) -> ResolutionOutcome {
    let trimmed = match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return ResolutionOutcome::Skipped,
    };

    if let Some(canonical) = registry.exact_upper(&trimmed.to_uppercase()) {
        return matched(canonical, MatchTier::ExactCase);
    }

    let key = normalize(trimmed);
    if key.is_empty() {
        return ResolutionOutcome::Unmatched;
    }

    if let Some(canonical) = registry.by_key(&key) {
        return matched(canonical, MatchTier::Normalized);
    }

    let mut candidates: BTreeSet<String> = registry
        .entries()
        .filter(|(candidate, _)| candidate.overlaps(&key))
        .map(|(_, name)| name.to_string())
        .collect();

    match candidates.len() {
        0 => ResolutionOutcome::Unmatched,
        1 => match candidates.pop_first() {
            Some(canonical) => ResolutionOutcome::Matched {
                canonical,
                tier: MatchTier::Containment,
            },
            None => ResolutionOutcome::Unmatched,
        },
        _ => ResolutionOutcome::Ambiguous { candidates },
    }
}

fn matched(canonical: &str, tier: MatchTier) -> ResolutionOutcome {
    ResolutionOutcome::Matched {
        canonical: canonical.to_string(),
        tier,
    }
}

impl CanonicalRegistry {
    /// Shorthand for [`resolve`] against this registry.
    pub fn resolve(&self, raw: Option<&str>) -> ResolutionOutcome {
        resolve(raw, self)
    }
}
