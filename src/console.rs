use colored::*;
use download_cleaner::progress::{extension_summary_line, RunReporter};
use download_cleaner::{Error, MoveError, RunReport};
use std::path::Path;

/// Prints run progress to the terminal.
pub struct ConsoleReporter;

impl RunReporter for ConsoleReporter {
    fn on_run_start(&self, _root: &Path) {
        println!("{}", "Running download cleaner...".cyan());
    }

    fn on_extension_summary(&self, extension: &str, count: usize) {
        println!("{}", extension_summary_line(extension, count));
    }

    fn on_move_failed(&self, source: &Path, error: &MoveError) {
        eprintln!(
            "  {} {}: {}",
            "✗".red(),
            source.display(),
            error.to_string().red()
        );
    }

    fn on_run_complete(&self, report: &RunReport) {
        let failed = report.failures().count();
        let failed = if failed > 0 {
            format!("{}", failed).red()
        } else {
            format!("{}", failed).green()
        };
        println!(
            "  {} {} logged, {} moved, {} failed in {:.2}s",
            "✓".green(),
            report.log.rows_written,
            format!("{}", report.moved_count()).green(),
            failed,
            report.duration.as_secs_f64()
        );
    }

    fn on_run_failed(&self, error: &Error) {
        eprintln!("  {} {}", "✗ Run failed:".red(), error);
    }
}
