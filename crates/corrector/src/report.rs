//! Correction run report and its text rendering.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use serde::Serialize;
use tracing::warn;
use zone_core::{CommuneUpdate, RecordId, ZoneRecord};

/// A record rewritten (or, in dry-run, to be rewritten) to its canonical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEntry {
    pub id: RecordId,
    pub from: Option<String>,
    pub to: String,
}

/// A record no canonical name is compatible with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedEntry {
    pub id: RecordId,
    pub raw: Option<String>,
}

/// A record compatible with several canonical names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousEntry {
    pub id: RecordId,
    pub raw: Option<String>,
    pub candidates: BTreeSet<String>,
}

/// A matched record whose update was rejected by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedEntry {
    pub id: RecordId,
    pub raw: Option<String>,
    pub target: String,
    pub reason: String,
}

/// Outcome counts and review lists of one correction run.
///
/// Counts are exact and lists hold at most `limit` entries each.
/// `truncated` is set once an unmatched, ambiguous or failed entry was left
/// out; the `changes` list is capped without affecting it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorrectionReport {
    pub updated_count: usize,
    pub unchanged_count: usize,
    pub skipped_count: usize,
    pub unmatched_count: usize,
    pub ambiguous_count: usize,
    pub failed_count: usize,
    pub changes: Vec<ChangeEntry>,
    pub unmatched: Vec<UnmatchedEntry>,
    pub ambiguous: Vec<AmbiguousEntry>,
    pub failed: Vec<FailedEntry>,
    pub truncated: bool,
    pub dry_run: bool,
    pub cancelled: bool,
    pub pages: usize,
    pub resumed_from: Option<RecordId>,
    pub last_id: Option<RecordId>,
    #[serde(skip)]
    limit: usize,
}

impl CorrectionReport {
    pub fn new(limit: usize, dry_run: bool) -> Self {
        Self {
            limit,
            dry_run,
            ..Self::default()
        }
    }

    /// Total number of records visited.
    pub fn processed(&self) -> usize {
        self.updated_count
            + self.unchanged_count
            + self.skipped_count
            + self.unmatched_count
            + self.ambiguous_count
            + self.failed_count
    }

    /// Whether any record needs manual attention.
    pub fn needs_review(&self) -> bool {
        self.unmatched_count > 0 || self.ambiguous_count > 0 || self.failed_count > 0
    }

    pub(crate) fn record_skipped(&mut self) {
        self.skipped_count += 1;
    }

    pub(crate) fn record_unchanged(&mut self) {
        self.unchanged_count += 1;
    }

    pub(crate) fn record_updated(&mut self, update: &CommuneUpdate) {
        self.updated_count += 1;
        if self.changes.len() < self.limit {
            self.changes.push(ChangeEntry {
                id: update.id,
                from: update.previous.clone(),
                to: update.commune.clone(),
            });
        }
    }

    pub(crate) fn record_unmatched(&mut self, record: &ZoneRecord) {
        self.unmatched_count += 1;
        if self.unmatched.len() < self.limit {
            self.unmatched.push(UnmatchedEntry {
                id: record.id,
                raw: record.commune.clone(),
            });
        } else {
            self.overflow("unmatched");
        }
    }

    pub(crate) fn record_ambiguous(&mut self, record: &ZoneRecord, candidates: BTreeSet<String>) {
        self.ambiguous_count += 1;
        if self.ambiguous.len() < self.limit {
            self.ambiguous.push(AmbiguousEntry {
                id: record.id,
                raw: record.commune.clone(),
                candidates,
            });
        } else {
            self.overflow("ambiguous");
        }
    }

    pub(crate) fn record_failed(&mut self, update: &CommuneUpdate, reason: &str) {
        self.failed_count += 1;
        if self.failed.len() < self.limit {
            self.failed.push(FailedEntry {
                id: update.id,
                raw: update.previous.clone(),
                target: update.commune.clone(),
                reason: reason.to_string(),
            });
        } else {
            self.overflow("failed");
        }
    }

    fn overflow(&mut self, list: &str) {
        if !self.truncated {
            warn!(
                "Report list {} reached {} entries; further entries are only counted",
                list, self.limit
            );
        }
        self.truncated = true;
    }

    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render a plain-text summary for terminals and logs.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let mode = if self.dry_run { " (dry run)" } else { "" };

        let _ = writeln!(out, "Commune correction{}", mode);
        let _ = writeln!(out, "  processed:  {}", self.processed());
        let updated_label = if self.dry_run { "would update" } else { "updated" };
        let _ = writeln!(out, "  {}: {}", updated_label, self.updated_count);
        let _ = writeln!(out, "  unchanged:  {}", self.unchanged_count);
        let _ = writeln!(out, "  skipped:    {}", self.skipped_count);
        let _ = writeln!(out, "  unmatched:  {}", self.unmatched_count);
        let _ = writeln!(out, "  ambiguous:  {}", self.ambiguous_count);
        let _ = writeln!(out, "  failed:     {}", self.failed_count);

        if self.cancelled {
            match self.last_id {
                Some(id) => {
                    let _ = writeln!(out, "Cancelled after record {}", id);
                }
                None => {
                    let _ = writeln!(out, "Cancelled before the first page");
                }
            }
        }

        if !self.unmatched.is_empty() {
            let _ = writeln!(out, "\nUnmatched:");
            for entry in &self.unmatched {
                let _ = writeln!(out, "  #{} {}", entry.id, display_raw(&entry.raw));
            }
        }

        if !self.ambiguous.is_empty() {
            let _ = writeln!(out, "\nAmbiguous:");
            for entry in &self.ambiguous {
                let candidates: Vec<&str> = entry.candidates.iter().map(String::as_str).collect();
                let _ = writeln!(
                    out,
                    "  #{} {} -> {}",
                    entry.id,
                    display_raw(&entry.raw),
                    candidates.join(" | ")
                );
            }
        }

        if !self.failed.is_empty() {
            let _ = writeln!(out, "\nFailed:");
            for entry in &self.failed {
                let _ = writeln!(
                    out,
                    "  #{} {} -> {}: {}",
                    entry.id,
                    display_raw(&entry.raw),
                    entry.target,
                    entry.reason
                );
            }
        }

        if self.truncated {
            let _ = writeln!(
                out,
                "\nLists truncated to {} entries each; counts are complete.",
                self.limit
            );
        }

        out
    }
}

fn display_raw(raw: &Option<String>) -> String {
    match raw {
        Some(value) => format!("{:?}", value),
        None => "<null>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, raw: &str) -> ZoneRecord {
        ZoneRecord::new(id, raw)
    }

    #[test]
    fn test_lists_are_capped() {
        let mut report = CorrectionReport::new(2, false);
        for id in 0..5 {
            report.record_unmatched(&record(id, "Plateu"));
        }

        assert_eq!(report.unmatched_count, 5);
        assert_eq!(report.unmatched.len(), 2);
        assert!(report.truncated);
    }

    #[test]
    fn test_capped_changes_do_not_mark_truncated() {
        let mut report = CorrectionReport::new(2, false);
        for id in 0..5 {
            report.record_updated(&CommuneUpdate {
                id: RecordId(id),
                previous: Some("cocody".to_string()),
                commune: "COCODY".to_string(),
            });
        }

        assert_eq!(report.updated_count, 5);
        assert_eq!(report.changes.len(), 2);
        assert!(!report.truncated);
        assert!(!report.summary().contains("truncated"));
    }

    #[test]
    fn test_processed_and_review() {
        let mut report = CorrectionReport::new(10, false);
        report.record_skipped();
        report.record_unchanged();
        assert_eq!(report.processed(), 2);
        assert!(!report.needs_review());

        let candidates: BTreeSet<String> = ["ANGRE", "COCODY"].iter().map(|s| s.to_string()).collect();
        report.record_ambiguous(&record(4, "Cocody Angre"), candidates);
        assert!(report.needs_review());
        assert_eq!(report.processed(), 3);
    }

    #[test]
    fn test_summary_mentions_entries() {
        let mut report = CorrectionReport::new(10, true);
        report.record_updated(&CommuneUpdate {
            id: RecordId(1),
            previous: Some("cocody".to_string()),
            commune: "COCODY".to_string(),
        });
        report.record_unmatched(&record(2, "Plateu"));
        report.record_failed(
            &CommuneUpdate {
                id: RecordId(3),
                previous: None,
                commune: "MARCORY".to_string(),
            },
            "locked",
        );

        let summary = report.summary();
        assert!(summary.contains("(dry run)"));
        assert!(summary.contains("would update: 1"));
        assert!(summary.contains("#2 \"Plateu\""));
        assert!(summary.contains("#3 <null> -> MARCORY: locked"));
    }

    #[test]
    fn test_json_omits_limit() {
        let report = CorrectionReport::new(7, false);
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["updated_count"], 0);
        assert!(value.get("limit").is_none());
    }
}
