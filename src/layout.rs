use crate::model::FileEntry;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

pub const LOG_DIR_NAME: &str = "log_files";
pub const LOG_FILE_NAME: &str = "download_log.csv";

/// Full English month name, e.g. "January".
pub fn month_name(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%B").to_string()
}

/// `<root>/<year>/<month name>/<extension>`
pub fn target_dir(root: &Path, modified: &NaiveDateTime, extension: &str) -> PathBuf {
    root.join(modified.year().to_string())
        .join(month_name(modified))
        .join(extension)
}

/// Target directory of a snapshot entry. The log and the relocator must agree on it.
pub fn entry_target_dir(root: &Path, entry: &FileEntry, lowercase_extensions: bool) -> PathBuf {
    let extension = entry.extension();
    if lowercase_extensions {
        target_dir(root, &entry.modified, &extension.to_lowercase())
    } else {
        target_dir(root, &entry.modified, &extension)
    }
}

/// Suffix appended to the stem of a colliding file, e.g. `_2024_06_01`.
pub fn collision_suffix(date: NaiveDate) -> String {
    date.format("_%Y_%m_%d").to_string()
}

pub fn log_dir(root: &Path) -> PathBuf {
    root.join(LOG_DIR_NAME)
}

pub fn log_file(root: &Path) -> PathBuf {
    log_dir(root).join(LOG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_dir_layout() {
        let modified = NaiveDate::from_ymd_opt(2023, 3, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(
            target_dir(Path::new("/downloads"), &modified, "zip"),
            PathBuf::from("/downloads/2023/March/zip")
        );
    }

    #[test]
    fn test_entry_target_dir_lowercases_on_request() {
        let modified = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let entry = FileEntry::new("/downloads/Scan.PDF", modified);
        assert_eq!(
            entry_target_dir(Path::new("/downloads"), &entry, false),
            PathBuf::from("/downloads/2024/January/PDF")
        );
        assert_eq!(
            entry_target_dir(Path::new("/downloads"), &entry, true),
            PathBuf::from("/downloads/2024/January/pdf")
        );
    }

    #[test]
    fn test_collision_suffix_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(collision_suffix(date), "_2024_06_01");
    }

    #[test]
    fn test_log_file_location() {
        assert_eq!(
            log_file(Path::new("/downloads")),
            PathBuf::from("/downloads/log_files/download_log.csv")
        );
    }
}
