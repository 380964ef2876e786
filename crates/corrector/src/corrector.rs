//! Batch correction of commune values over a record store.

use std::future::Future;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, error, info, warn};
use zone_core::{
    resolve, CanonicalNameProvider, CanonicalRegistry, CommuneUpdate, CursorStore, RecordId,
    RecordStore, ResolutionOutcome, ZoneRecord,
};

use crate::config::CorrectorConfig;
use crate::error::CorrectorError;
use crate::report::CorrectionReport;

/// Resolves every record of a store against the canonical registry and
/// rewrites the ones with a single unambiguous match.
///
/// Pages are processed in id order by a single writer. Each page's updates
/// commit as one unit; a rejected page leaves all of its records untouched
/// and the run moves on.
pub struct BatchCorrector<P, S>
where
    P: CanonicalNameProvider,
    S: RecordStore,
{
    provider: P,
    store: S,
    cursors: Option<Arc<dyn CursorStore>>,
    config: CorrectorConfig,
}

impl<P, S> BatchCorrector<P, S>
where
    P: CanonicalNameProvider,
    S: RecordStore,
{
    /// Create a new corrector.
    pub fn new(provider: P, store: S, config: CorrectorConfig) -> Self {
        Self {
            provider,
            store,
            cursors: None,
            config,
        }
    }

    /// Create a corrector with default configuration.
    pub fn with_defaults(provider: P, store: S) -> Self {
        Self::new(provider, store, CorrectorConfig::default())
    }

    /// Persist the last committed id after each page so an interrupted run
    /// can resume.
    pub fn with_cursor_store(mut self, cursors: Arc<dyn CursorStore>) -> Self {
        self.cursors = Some(cursors);
        self
    }

    pub fn config(&self) -> &CorrectorConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run a full correction pass.
    pub async fn run(&self) -> Result<CorrectionReport, CorrectorError> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Run a correction pass that stops at the next page boundary once
    /// `shutdown_signal` completes.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let report = corrector
    ///     .run_with_shutdown(async {
    ///         let _ = tokio::signal::ctrl_c().await;
    ///     })
    ///     .await?;
    /// ```
    pub async fn run_with_shutdown<F>(
        &self,
        shutdown_signal: F,
    ) -> Result<CorrectionReport, CorrectorError>
    where
        F: Future<Output = ()> + Send,
    {
        self.config.validate()?;

        let registry = CanonicalRegistry::load(&self.provider).await.map_err(|e| {
            error!("Aborting correction, registry not loaded: {}", e);
            e
        })?;

        info!(
            "Loaded {} canonical zone names from {}",
            registry.len(),
            self.provider.name()
        );

        self.correct(&registry, shutdown_signal).await
    }

    /// Correct every record against an already built registry.
    pub async fn correct<F>(
        &self,
        registry: &CanonicalRegistry,
        shutdown_signal: F,
    ) -> Result<CorrectionReport, CorrectorError>
    where
        F: Future<Output = ()> + Send,
    {
        self.config.validate()?;

        let mut report = CorrectionReport::new(self.config.report_limit, self.config.dry_run);
        let mut after = self.starting_point().await?;
        report.resumed_from = after;

        info!(
            "Starting commune correction on {} (batch size: {}, dry run: {}, after: {:?})",
            self.store.name(),
            self.config.batch_size,
            self.config.dry_run,
            after.map(|id| id.0)
        );

        tokio::pin!(shutdown_signal);

        // Once a page rolls back the cursor stays before it for the rest of
        // the run, so a resume retries that page.
        let mut cursor_held = false;

        loop {
            let page = tokio::select! {
                biased;

                () = &mut shutdown_signal => {
                    info!("Shutdown signal received, stopping after record {:?}", after.map(|id| id.0));
                    report.cancelled = true;
                    break;
                }

                page = self.store.fetch_page(after, self.config.batch_size) => page?,
            };

            let Some(last) = page.last().map(|record| record.id) else {
                break;
            };

            let before = report.updated_count;
            let committed = self.process_page(registry, &page, &mut report).await;
            info!(
                "Page {} done: {} records through id {}, {} updated",
                report.pages + 1,
                page.len(),
                last,
                report.updated_count - before
            );

            after = Some(last);
            report.last_id = after;
            report.pages += 1;
            if !committed && !cursor_held {
                warn!("Page through record {} rolled back; cursor no longer advances", last);
                cursor_held = true;
            }
            if !cursor_held {
                self.save_cursor(last).await;
            }

            if page.len() < self.config.batch_size {
                break;
            }
        }

        if !report.cancelled {
            self.clear_cursor().await;
        }

        info!(
            "Commune correction finished: {} updated, {} unchanged, {} skipped, {} unmatched, {} ambiguous, {} failed",
            report.updated_count,
            report.unchanged_count,
            report.skipped_count,
            report.unmatched_count,
            report.ambiguous_count,
            report.failed_count
        );

        Ok(report)
    }

    async fn starting_point(&self) -> Result<Option<RecordId>, CorrectorError> {
        if !self.config.resume {
            return Ok(None);
        }

        match &self.cursors {
            Some(cursors) => {
                let cursor = cursors.load_cursor(&self.config.job_name).await?;
                if let Some(id) = cursor {
                    info!("Resuming {} after record {}", self.config.job_name, id);
                }
                Ok(cursor)
            }
            None => {
                warn!("Resume requested but no cursor store is configured; starting from the beginning");
                Ok(None)
            }
        }
    }

    async fn save_cursor(&self, last_id: RecordId) {
        if self.config.dry_run {
            return;
        }
        if let Some(cursors) = &self.cursors {
            if let Err(e) = cursors.save_cursor(&self.config.job_name, last_id).await {
                warn!("Failed to save cursor at record {}: {}", last_id, e);
            }
        }
    }

    async fn clear_cursor(&self) {
        if self.config.dry_run {
            return;
        }
        if let Some(cursors) = &self.cursors {
            if let Err(e) = cursors.clear_cursor(&self.config.job_name).await {
                warn!("Failed to clear cursor for {}: {}", self.config.job_name, e);
            }
        }
    }

    /// Classify one page and commit its updates atomically.
    ///
    /// Returns `false` only when the store rejected the page.
    async fn process_page(
        &self,
        registry: &CanonicalRegistry,
        page: &[ZoneRecord],
        report: &mut CorrectionReport,
    ) -> bool {
        let outcomes = self.resolve_page(registry, page);
        let mut pending = Vec::new();

        for (record, outcome) in page.iter().zip(outcomes) {
            debug!("Record {}: {:?} -> {}", record.id, record.commune, outcome.label());

            match outcome {
                ResolutionOutcome::Skipped => report.record_skipped(),
                ResolutionOutcome::Matched { canonical, .. } => {
                    if record.commune.as_deref() == Some(canonical.as_str()) {
                        report.record_unchanged();
                    } else {
                        pending.push(CommuneUpdate {
                            id: record.id,
                            previous: record.commune.clone(),
                            commune: canonical,
                        });
                    }
                }
                ResolutionOutcome::Unmatched => report.record_unmatched(record),
                ResolutionOutcome::Ambiguous { candidates } => {
                    report.record_ambiguous(record, candidates)
                }
            }
        }

        if pending.is_empty() {
            return true;
        }

        if self.config.dry_run {
            for update in &pending {
                report.record_updated(update);
            }
            return true;
        }

        match self.store.apply_updates(&pending).await {
            Ok(()) => {
                debug!("Committed {} updates", pending.len());
                for update in &pending {
                    report.record_updated(update);
                }
                true
            }
            Err(e) => {
                let reason = e.to_string();
                error!(
                    "Page rolled back, {} updates not applied: {}",
                    pending.len(),
                    reason
                );
                for update in &pending {
                    error!(
                        "Update of record {} from {:?} to {} failed: {}",
                        update.id, update.previous, update.commune, reason
                    );
                    report.record_failed(update, &reason);
                }
                false
            }
        }
    }

    /// Resolve a page, in parallel once it is large enough.
    ///
    /// Output order matches `page`.
    fn resolve_page(
        &self,
        registry: &CanonicalRegistry,
        page: &[ZoneRecord],
    ) -> Vec<ResolutionOutcome> {
        if page.len() >= self.config.parallel_threshold {
            page.par_iter()
                .map(|record| resolve(record.commune.as_deref(), registry))
                .collect()
        } else {
            page.iter()
                .map(|record| resolve(record.commune.as_deref(), registry))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_store::{InMemoryRecordStore, StaticNameProvider, UnavailableNameProvider};
    use zone_core::RegistryError;

    fn provider() -> StaticNameProvider {
        StaticNameProvider::new(["COCODY", "PLATEAU", "MARCORY"])
    }

    #[tokio::test]
    async fn test_unavailable_registry_touches_nothing() {
        let store = InMemoryRecordStore::new([ZoneRecord::new(1, "cocody")]);
        let corrector =
            BatchCorrector::with_defaults(UnavailableNameProvider::default(), store);

        let result = corrector.run().await;
        assert!(matches!(
            result,
            Err(CorrectorError::Registry(RegistryError::Unavailable(_)))
        ));
        assert_eq!(corrector.store().fetch_calls().await, 0);
        assert_eq!(corrector.store().apply_calls().await, 0);
    }

    #[tokio::test]
    async fn test_configuration_error_touches_nothing() {
        let store = InMemoryRecordStore::new([ZoneRecord::new(1, "cocody")]);
        let corrector = BatchCorrector::with_defaults(
            StaticNameProvider::new(["ADJAME", "ADJAMÉ"]),
            store,
        );

        let result = corrector.run().await;
        assert!(matches!(
            result,
            Err(CorrectorError::Registry(RegistryError::Configuration(_)))
        ));
        assert_eq!(corrector.store().fetch_calls().await, 0);
    }

    #[tokio::test]
    async fn test_unchanged_records_not_written() {
        let store = InMemoryRecordStore::new([
            ZoneRecord::new(1, "COCODY"),
            ZoneRecord::new(2, "PLATEAU"),
        ]);
        let corrector = BatchCorrector::with_defaults(provider(), store);

        let report = corrector.run().await.unwrap();
        assert_eq!(report.unchanged_count, 2);
        assert_eq!(report.updated_count, 0);
        assert_eq!(corrector.store().apply_calls().await, 0);
    }

    #[tokio::test]
    async fn test_dry_run_reports_without_writing() {
        let store = InMemoryRecordStore::new([
            ZoneRecord::new(1, "cocody"),
            ZoneRecord::new(2, "Plateu"),
        ]);
        let config = CorrectorConfig::default().with_dry_run(true);
        let corrector = BatchCorrector::new(provider(), store, config);

        let report = corrector.run().await.unwrap();
        assert!(report.dry_run);
        assert_eq!(report.updated_count, 1);
        assert_eq!(report.changes[0].to, "COCODY");
        assert_eq!(report.unmatched_count, 1);
        assert_eq!(corrector.store().apply_calls().await, 0);
        assert_eq!(corrector.store().commune(1).await.as_deref(), Some("cocody"));
    }

    #[tokio::test]
    async fn test_parallel_resolution_matches_sequential() {
        let records: Vec<ZoneRecord> = (1..=300)
            .map(|id| {
                let raw = match id % 4 {
                    0 => "cocody",
                    1 => "Abidjan-Plateau",
                    2 => "Plateu",
                    _ => "",
                };
                ZoneRecord::new(id, raw)
            })
            .collect();

        let mut sequential = CorrectorConfig::default().with_dry_run(true);
        sequential.parallel_threshold = usize::MAX;
        let mut parallel = CorrectorConfig::default().with_dry_run(true);
        parallel.parallel_threshold = 1;

        let a = InMemoryRecordStore::new(records.clone());
        let a = BatchCorrector::new(provider(), a, sequential).run().await.unwrap();
        let b = InMemoryRecordStore::new(records);
        let b = BatchCorrector::new(provider(), b, parallel).run().await.unwrap();

        assert_eq!(a, b);
        assert_eq!(a.updated_count, 150);
        assert_eq!(a.unmatched_count, 75);
        assert_eq!(a.skipped_count, 75);
    }

    #[tokio::test]
    async fn test_invalid_config() {
        let store = InMemoryRecordStore::default();
        let config = CorrectorConfig::default().with_batch_size(0);
        let corrector = BatchCorrector::new(provider(), store, config);
        assert!(matches!(
            corrector.run().await,
            Err(CorrectorError::InvalidConfig(_))
        ));
    }
}
