use crate::engine::RunReport;
use crate::error::{Error, MoveError};
use std::path::Path;

/// Trait for reporting what a cleaning run is doing.
///
/// The binary implements it with colored console output, tests use `SilentReporter`.
/// All methods have default no-op implementations.
pub trait RunReporter {
    fn on_run_start(&self, _root: &Path) {}
    fn on_extension_summary(&self, _extension: &str, _count: usize) {}
    fn on_log_written(&self, _log_path: &Path, _rows: usize) {}
    fn on_file_moved(&self, _source: &Path, _target: &Path) {}
    fn on_move_failed(&self, _source: &Path, _error: &MoveError) {}
    fn on_run_complete(&self, _report: &RunReport) {}
    fn on_run_failed(&self, _error: &Error) {}
}

/// No-op reporter for silent operation.
pub struct SilentReporter;

impl RunReporter for SilentReporter {}

/// Console line for one extension group of a run.
pub fn extension_summary_line(extension: &str, count: usize) -> String {
    format!("{} Files moved with an extension of {}", count, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_summary_line() {
        assert_eq!(
            extension_summary_line("zip", 3),
            "3 Files moved with an extension of zip"
        );
    }
}
