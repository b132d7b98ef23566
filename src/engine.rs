use crate::config::AppConfig;
use crate::error::Error;
use crate::layout;
use crate::log_store::{self, LogWriteResult};
use crate::progress::RunReporter;
use crate::relocate::{self, FileOutcome};
use crate::scanner;
use chrono::{Local, NaiveDateTime};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct CleanerEngine {
    config: AppConfig,
}

#[derive(Debug)]
pub struct RunReport {
    /// Wall-clock time shared by every log row of the run.
    pub processed_at: NaiveDateTime,
    pub collision_suffix: String,
    pub snapshot_size: usize,
    pub log: LogWriteResult,
    pub outcomes: Vec<FileOutcome>,
    pub duration: Duration,
}

impl RunReport {
    pub fn moved_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_moved()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_moved())
    }
}

impl CleanerEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.config.watch_folder
    }

    /// Run one full cleaning pass against the local clock.
    pub fn run_once(&self, reporter: &dyn RunReporter) -> Result<RunReport, Error> {
        self.run_once_at(Local::now().naive_local(), reporter)
    }

    /// Run one full cleaning pass:
    /// 1. Snapshot the top level of the watched folder
    /// 2. Append one log row per snapshot entry
    /// 3. Move every entry into `<year>/<month>/<ext>/`
    ///
    /// The log is written before anything moves; if it cannot be written the
    /// run stops and no file is touched.
    pub fn run_once_at(
        &self,
        now: NaiveDateTime,
        reporter: &dyn RunReporter,
    ) -> Result<RunReport, Error> {
        let root = self.root();
        let lowercase = self.config.lowercase_extensions;
        let collision_suffix = layout::collision_suffix(now.date());
        let start = Instant::now();

        reporter.on_run_start(root);
        info!("Cleaning {}", root.display());

        let snapshot = scanner::build_snapshot(root)?;
        debug!("Snapshot holds {} files", snapshot.len());

        let log = log_store::append_log(&snapshot, root, now, lowercase, reporter)?;

        let outcomes = relocate::relocate(&snapshot, root, &collision_suffix, lowercase, reporter);

        let report = RunReport {
            processed_at: now,
            collision_suffix,
            snapshot_size: snapshot.len(),
            log,
            outcomes,
            duration: start.elapsed(),
        };

        let failed = report.failures().count();
        if failed > 0 {
            warn!("{} of {} files could not be moved", failed, report.snapshot_size);
        }
        info!(
            "Run finished in {:.2}s: {} moved, {} failed",
            report.duration.as_secs_f64(),
            report.moved_count(),
            failed
        );
        reporter.on_run_complete(&report);

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentReporter;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_run_on_missing_root_fails_without_side_effects() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("downloads");
        let engine = CleanerEngine::new(AppConfig::new(&root));

        let result = engine.run_once(&SilentReporter);
        assert!(matches!(result, Err(Error::RootNotFound(_))));
        assert!(!root.exists());
    }

    #[test]
    fn test_log_failure_prevents_moves() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join(layout::LOG_DIR_NAME), "blocks the log dir").unwrap();

        let engine = CleanerEngine::new(AppConfig::new(root));
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert!(engine.run_once_at(now, &SilentReporter).is_err());
        assert!(root.join("a.txt").is_file());
    }
}
