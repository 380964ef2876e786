//! Corrector settings.

use std::env;

use crate::error::CorrectorError;

/// Default number of records read and committed per page.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Default cap on listed unmatched, ambiguous, failed and changed entries.
pub const DEFAULT_REPORT_LIMIT: usize = 200;

/// Pages at least this large are resolved in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Cursor job name used when none is configured.
pub const DEFAULT_JOB_NAME: &str = "commune";

/// Settings for a correction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectorConfig {
    /// Records per page; each page commits atomically.
    pub batch_size: usize,
    /// Maximum entries kept in each report list.
    pub report_limit: usize,
    /// Compute and report without writing anything.
    pub dry_run: bool,
    /// Start after the persisted cursor instead of the first record.
    pub resume: bool,
    /// Page size from which resolution runs on the rayon pool.
    pub parallel_threshold: usize,
    /// Name under which the resume cursor is stored.
    pub job_name: String,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            report_limit: DEFAULT_REPORT_LIMIT,
            dry_run: false,
            resume: false,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            job_name: DEFAULT_JOB_NAME.to_string(),
        }
    }
}

impl CorrectorConfig {
    /// Load settings from environment variables.
    ///
    /// Optional env vars:
    /// - `COMMUNE_BATCH_SIZE` (default: 500)
    /// - `COMMUNE_REPORT_LIMIT` (default: 200)
    /// - `COMMUNE_DRY_RUN` (default: false)
    /// - `COMMUNE_RESUME` (default: false)
    /// - `COMMUNE_JOB_NAME` (default: commune)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(value) = env_usize("COMMUNE_BATCH_SIZE") {
            config.batch_size = value;
        }
        if let Some(value) = env_usize("COMMUNE_REPORT_LIMIT") {
            config.report_limit = value;
        }
        if let Some(value) = env_bool("COMMUNE_DRY_RUN") {
            config.dry_run = value;
        }
        if let Some(value) = env_bool("COMMUNE_RESUME") {
            config.resume = value;
        }
        if let Ok(job) = env::var("COMMUNE_JOB_NAME") {
            if !job.trim().is_empty() {
                config.job_name = job.trim().to_string();
            }
        }

        config
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_report_limit(mut self, report_limit: usize) -> Self {
        self.report_limit = report_limit;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    pub fn validate(&self) -> Result<(), CorrectorError> {
        if self.batch_size == 0 {
            return Err(CorrectorError::InvalidConfig(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.job_name.is_empty() {
            return Err(CorrectorError::InvalidConfig(
                "job name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_usize(key: &str) -> Option<usize> {
    env::var(key).ok()?.trim().parse().ok()
}

fn env_bool(key: &str) -> Option<bool> {
    let value = env::var(key).ok()?;
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
