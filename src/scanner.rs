use crate::error::{Error, Result};
use crate::model::{FileEntry, InventorySnapshot};
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use glob::{MatchOptions, Pattern};
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, warn};

/// Names with an extension. Dotfiles such as `.bashrc` do not match.
const FILE_PATTERN: &str = "*.*";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Lists the files directly inside `root` that carry an extension and captures
/// their modification times. Subdirectories are never entered, so files that
/// were already relocated are not picked up again.
pub fn build_snapshot(root: &Path) -> Result<InventorySnapshot> {
    let pattern = Pattern::new(FILE_PATTERN)?;

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(Error::RootNotFound(root.to_path_buf()));
        }
        Err(err) => {
            return Err(Error::Io(io::Error::new(
                err.kind(),
                format!("Error reading directory {}: {}", root.display(), err),
            )));
        }
    };

    let mut files = Vec::new();

    for entry_result in entries {
        let entry = entry_result.map_err(|err| {
            io::Error::new(
                err.kind(),
                format!("Error reading entry in directory {}: {}", root.display(), err),
            )
        })?;

        let name = entry.file_name().to_string_lossy().into_owned();
        if !pattern.matches_with(&name, MATCH_OPTIONS) {
            continue;
        }

        let path = entry.path();
        if path.extension().map_or(true, |ext| ext.is_empty()) {
            continue;
        }

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("{} disappeared while scanning, skipping", path.display());
                continue;
            }
            Err(err) => {
                return Err(Error::Io(io::Error::new(
                    err.kind(),
                    format!("Error getting metadata for {}: {}", path.display(), err),
                )));
            }
        };

        if !metadata.is_file() {
            continue;
        }

        files.push(FileEntry::new(path, to_whole_seconds(metadata.modified()?)));
    }

    debug!("{} files found in {}", files.len(), root.display());

    Ok(InventorySnapshot::new(root, files))
}

fn to_whole_seconds(time: SystemTime) -> NaiveDateTime {
    let utc: DateTime<Utc> = time.into();
    let naive = utc.naive_utc();
    naive.with_nanosecond(0).unwrap_or(naive)
}
