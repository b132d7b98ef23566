use crate::error::MoveError;
use crate::layout;
use crate::model::{FileEntry, InventorySnapshot};
use crate::progress::RunReporter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Suffixed names tried per collision: `<stem><suffix>.<ext>` first, then
/// `<stem><suffix>_1.<ext>` up to `_99`.
pub const MAX_COLLISION_ATTEMPTS: u32 = 100;

/// Result of relocating one snapshot entry.
#[derive(Debug)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub result: Result<PathBuf, MoveError>,
}

impl FileOutcome {
    pub fn is_moved(&self) -> bool {
        self.result.is_ok()
    }

    pub fn target(&self) -> Option<&Path> {
        self.result.as_ref().ok().map(PathBuf::as_path)
    }
}

/// Moves every snapshot entry into `<root>/<year>/<month>/<ext>/`. A failure
/// on one file is recorded in its outcome and the remaining files still move.
pub fn relocate(
    snapshot: &InventorySnapshot,
    root: &Path,
    collision_suffix: &str,
    lowercase_extensions: bool,
    reporter: &dyn RunReporter,
) -> Vec<FileOutcome> {
    snapshot
        .iter()
        .map(|entry| {
            let result = relocate_entry(entry, root, collision_suffix, lowercase_extensions);
            match &result {
                Ok(target) => {
                    info!("Moved {} -> {}", entry.path.display(), target.display());
                    reporter.on_file_moved(&entry.path, target);
                }
                Err(err) => {
                    error!("Failed to move {}: {}", entry.path.display(), err);
                    reporter.on_move_failed(&entry.path, err);
                }
            }
            FileOutcome {
                source: entry.path.clone(),
                result,
            }
        })
        .collect()
}

fn relocate_entry(
    entry: &FileEntry,
    root: &Path,
    collision_suffix: &str,
    lowercase_extensions: bool,
) -> Result<PathBuf, MoveError> {
    if !is_occupied(&entry.path) {
        return Err(MoveError::SourceVanished);
    }

    let dir = layout::entry_target_dir(root, entry, lowercase_extensions);
    fs::create_dir_all(&dir).map_err(|source| MoveError::CreateDir {
        dir: dir.clone(),
        source,
    })?;

    let target = free_target(&dir, entry, collision_suffix)?;
    debug!("Renaming {} to {}", entry.path.display(), target.display());

    fs::rename(&entry.path, &target).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound && !is_occupied(&entry.path) {
            MoveError::SourceVanished
        } else {
            MoveError::Rename {
                target: target.clone(),
                source,
            }
        }
    })?;

    Ok(target)
}

/// First unoccupied destination for `entry` inside `dir`.
pub fn free_target(dir: &Path, entry: &FileEntry, collision_suffix: &str) -> Result<PathBuf, MoveError> {
    let target = dir.join(entry.file_name());
    if !is_occupied(&target) {
        return Ok(target);
    }

    let stem = entry.stem();
    let ext = entry.extension();

    let candidate = dir.join(format!("{}{}.{}", stem, collision_suffix, ext));
    if !is_occupied(&candidate) {
        return Ok(candidate);
    }

    for attempt in 1..MAX_COLLISION_ATTEMPTS {
        let candidate = dir.join(format!("{}{}_{}.{}", stem, collision_suffix, attempt, ext));
        if !is_occupied(&candidate) {
            return Ok(candidate);
        }
    }

    Err(MoveError::TargetExists {
        dir: dir.to_path_buf(),
        attempts: MAX_COLLISION_ATTEMPTS,
    })
}

fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentReporter;
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::tempdir;

    fn january() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 20)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_free_target_without_collision() {
        let tmp = tempdir().unwrap();
        let entry = FileEntry::new(tmp.path().join("report.txt"), january());
        let target = free_target(tmp.path(), &entry, "_2024_06_01").unwrap();
        assert_eq!(target, tmp.path().join("report.txt"));
    }

    #[test]
    fn test_free_target_walks_the_collision_chain() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        fs::write(dir.join("report.txt"), "1").unwrap();
        fs::write(dir.join("report_2024_06_01.txt"), "2").unwrap();
        fs::write(dir.join("report_2024_06_01_1.txt"), "3").unwrap();

        let entry = FileEntry::new("/elsewhere/report.txt", january());
        let target = free_target(dir, &entry, "_2024_06_01").unwrap();
        assert_eq!(target, dir.join("report_2024_06_01_2.txt"));
    }

    #[test]
    fn test_free_target_gives_up_after_limit() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        fs::write(dir.join("x.log"), "").unwrap();
        fs::write(dir.join("x_s.log"), "").unwrap();
        for n in 1..MAX_COLLISION_ATTEMPTS {
            fs::write(dir.join(format!("x_s_{}.log", n)), "").unwrap();
        }

        let entry = FileEntry::new("/elsewhere/x.log", january());
        match free_target(dir, &entry, "_s") {
            Err(MoveError::TargetExists { attempts, .. }) => {
                assert_eq!(attempts, MAX_COLLISION_ATTEMPTS)
            }
            other => panic!("expected TargetExists, got {:?}", other),
        }
    }

    #[test]
    fn test_vanished_source_is_reported_and_others_move() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("kept.txt"), "kept").unwrap();

        let snapshot = InventorySnapshot::new(
            root,
            vec![
                FileEntry::new(root.join("gone.txt"), january()),
                FileEntry::new(root.join("kept.txt"), january()),
            ],
        );
        let outcomes = relocate(&snapshot, root, "_2024_06_01", false, &SilentReporter);

        assert!(matches!(outcomes[0].result, Err(MoveError::SourceVanished)));
        assert_eq!(
            outcomes[1].target(),
            Some(root.join("2024/January/txt/kept.txt").as_path())
        );
        assert!(root.join("2024/January/txt/kept.txt").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_rename_into_read_only_dir_fails_for_that_file_only() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("locked.txt"), "locked").unwrap();
        fs::write(root.join("free.zip"), "free").unwrap();

        let locked_dir = root.join("2024/January/txt");
        fs::create_dir_all(&locked_dir).unwrap();
        fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits do not bind a privileged user.
        if fs::write(locked_dir.join("write_check"), "").is_ok() {
            fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let snapshot = InventorySnapshot::new(
            root,
            vec![
                FileEntry::new(root.join("locked.txt"), january()),
                FileEntry::new(root.join("free.zip"), january()),
            ],
        );
        let outcomes = relocate(&snapshot, root, "_2024_06_01", false, &SilentReporter);

        fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o755)).unwrap();

        match &outcomes[0].result {
            Err(MoveError::Rename { target, .. }) => {
                assert_eq!(target, &locked_dir.join("locked.txt"))
            }
            other => panic!("expected Rename failure, got {:?}", other),
        }
        assert!(root.join("locked.txt").is_file());
        assert!(outcomes[1].is_moved());
        assert!(root.join("2024/January/zip/free.zip").is_file());
    }

    #[test]
    fn test_existing_target_dir_is_fine() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("2024/January/txt")).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();

        let snapshot =
            InventorySnapshot::new(root, vec![FileEntry::new(root.join("a.txt"), january())]);
        let outcomes = relocate(&snapshot, root, "_2024_06_01", false, &SilentReporter);
        assert!(outcomes[0].is_moved());
        assert!(!root.join("a.txt").exists());
    }
}
