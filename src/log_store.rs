use crate::error::{Error, Result};
use crate::layout;
use crate::model::{FileEntry, InventorySnapshot};
use crate::progress::RunReporter;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const LOG_HEADER: [&str; 6] = [
    "file_name",
    "parent_path",
    "ext",
    "download_date",
    "target_path",
    "move_date",
];

const DOWNLOAD_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MOVE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One row of `download_log.csv`. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub file_name: String,
    pub parent_path: String,
    pub ext: String,
    pub download_date: String,
    pub target_path: String,
    pub move_date: String,
}

impl LogRecord {
    pub fn from_entry(
        entry: &FileEntry,
        root: &Path,
        processed_at: &NaiveDateTime,
        lowercase_extensions: bool,
    ) -> Self {
        Self {
            file_name: entry.stem(),
            parent_path: entry.parent_dir().to_string_lossy().into_owned(),
            ext: entry.extension(),
            download_date: entry.modified.format(DOWNLOAD_DATE_FORMAT).to_string(),
            target_path: layout::entry_target_dir(root, entry, lowercase_extensions)
                .to_string_lossy()
                .into_owned(),
            move_date: processed_at.format(MOVE_DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug)]
pub struct LogWriteResult {
    pub log_path: PathBuf,
    pub rows_written: usize,
    /// True when this call created the file and wrote the header.
    pub created: bool,
    /// Distinct stems per extension, sorted by extension.
    pub extension_counts: BTreeMap<String, usize>,
}

/// Number of distinct stems for every extension in the snapshot.
pub fn extension_counts(snapshot: &InventorySnapshot) -> BTreeMap<String, usize> {
    let mut stems: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for entry in snapshot {
        stems.entry(entry.extension()).or_default().insert(entry.stem());
    }
    stems
        .into_iter()
        .map(|(ext, names)| (ext, names.len()))
        .collect()
}

/// Appends one row per snapshot entry to `<root>/log_files/download_log.csv`,
/// creating the directory and the header on first use. Existing rows are never
/// touched. An empty snapshot still bootstraps the directory and header.
pub fn append_log(
    snapshot: &InventorySnapshot,
    root: &Path,
    processed_at: NaiveDateTime,
    lowercase_extensions: bool,
    reporter: &dyn RunReporter,
) -> Result<LogWriteResult> {
    if !root.is_dir() {
        return Err(Error::RootNotFound(root.to_path_buf()));
    }

    let records: Vec<LogRecord> = snapshot
        .iter()
        .map(|entry| LogRecord::from_entry(entry, root, &processed_at, lowercase_extensions))
        .collect();

    let counts = extension_counts(snapshot);
    for (ext, count) in &counts {
        debug!("{} files with extension {}", count, ext);
        reporter.on_extension_summary(ext, *count);
    }

    let log_dir = layout::log_dir(root);
    fs::create_dir_all(&log_dir).map_err(|source| Error::LogStore {
        path: log_dir.clone(),
        source,
    })?;

    let log_path = layout::log_file(root);
    let created = !log_path.exists();
    let bytes = serialize_records(&records, created)?;

    let mut options = OpenOptions::new();
    if created {
        options.write(true).create_new(true);
    } else {
        options.append(true);
    }

    let mut file = options.open(&log_path).map_err(|source| Error::LogStore {
        path: log_path.clone(),
        source,
    })?;
    file.write_all(&bytes)
        .and_then(|_| file.flush())
        .map_err(|source| Error::LogStore {
            path: log_path.clone(),
            source,
        })?;

    debug!(
        "Appended {} rows to {} (created: {})",
        records.len(),
        log_path.display(),
        created
    );
    reporter.on_log_written(&log_path, records.len());

    Ok(LogWriteResult {
        log_path,
        rows_written: records.len(),
        created,
        extension_counts: counts,
    })
}

/// Renders the rows in memory so nothing reaches the file if serialization fails.
fn serialize_records(records: &[LogRecord], with_header: bool) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    if with_header {
        wtr.write_record(LOG_HEADER)?;
    }
    for record in records {
        wtr.serialize(record)?;
    }

    wtr.into_inner().map_err(|err| Error::Io(err.into_error()))
}

/// Reads every data row back, in file order.
pub fn read_log(log_path: &Path) -> Result<Vec<LogRecord>> {
    let mut rdr = csv::Reader::from_path(log_path)?;
    let mut rows = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let field = |i: usize| row.get(i).unwrap_or_default().to_string();
        rows.push(LogRecord {
            file_name: field(0),
            parent_path: field(1),
            ext: field(2),
            download_date: field(3),
            target_path: field(4),
            move_date: field(5),
        });
    }
    Ok(rows)
}
