use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// A file found at the top level of the watched folder, with the
/// modification time captured when the snapshot was taken (UTC, whole seconds).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub modified: NaiveDateTime,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>, modified: NaiveDateTime) -> Self {
        Self {
            path: path.into(),
            modified,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name without its last extension.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Last extension without the leading dot.
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn parent_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Every matching file of one scan, in enumeration order.
#[derive(Debug, Clone, Default)]
pub struct InventorySnapshot {
    root: PathBuf,
    entries: Vec<FileEntry>,
}

impl InventorySnapshot {
    pub fn new(root: impl Into<PathBuf>, entries: Vec<FileEntry>) -> Self {
        Self {
            root: root.into(),
            entries,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a InventorySnapshot {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
