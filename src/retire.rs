use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::RetireError;

/// Default file name for the retire list
pub const DEFAULT_RETIRE_FILENAME: &str = "retired_paths.txt";

/// Outcome of a retire operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetireOutcome {
    /// The path was added to the retire list
    Added,
    /// The path was already retired; nothing changed
    AlreadyRetired,
}

/// Persistent set of episode destination paths the user has already consumed.
///
/// Backed by a newline-delimited text file, one path per line. Paths in the
/// set are skipped by the sync engine even when the file no longer exists on
/// disk.
#[derive(Debug)]
pub struct RetireStore {
    file: PathBuf,
    paths: Vec<String>,
    index: HashSet<String>,
}

impl RetireStore {
    /// Load the retire list from `file`
    ///
    /// A missing file is an empty store, not an error. Other read failures
    /// are returned so the caller can warn and fall back to an empty store.
    pub fn load(file: &Path) -> Result<Self, RetireError> {
        let paths: Vec<String> = match std::fs::read_to_string(file) {
            Ok(content) => content
                .lines()
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(RetireError::LoadFailed {
                    path: file.to_path_buf(),
                    source: e,
                });
            }
        };

        let index = paths.iter().cloned().collect();

        Ok(Self {
            file: file.to_path_buf(),
            paths,
            index,
        })
    }

    /// An empty store that will persist to `file`
    pub fn empty(file: &Path) -> Self {
        Self {
            file: file.to_path_buf(),
            paths: Vec::new(),
            index: HashSet::new(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Mark an episode path as consumed and persist the list.
    ///
    /// Retiring a path that is already present changes nothing and reports
    /// `AlreadyRetired`. The list file is rewritten before any deletion, so a
    /// failed delete never loses retire entries. With `delete` set the file
    /// at `path` is removed from disk; its absence is treated as already
    /// deleted.
    pub fn retire(&mut self, path: &str, delete: bool) -> Result<RetireOutcome, RetireError> {
        if self.index.contains(path) {
            return Ok(RetireOutcome::AlreadyRetired);
        }

        self.paths.push(path.to_string());
        self.index.insert(path.to_string());
        self.persist()?;

        if delete
            && let Err(e) = std::fs::remove_file(path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            return Err(RetireError::DeleteFailed {
                path: PathBuf::from(path),
                source: e,
            });
        }

        Ok(RetireOutcome::Added)
    }

    fn persist(&self) -> Result<(), RetireError> {
        let mut content = self.paths.join("\n");
        content.push('\n');

        std::fs::write(&self.file, content).map_err(|e| RetireError::WriteFailed {
            path: self.file.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = RetireStore::load(&dir.path().join(DEFAULT_RETIRE_FILENAME)).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn retire_persists_one_path_per_line() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("retired_paths.txt");

        let mut store = RetireStore::load(&file).unwrap();
        store.retire("output/Show/ep1.mp3", false).unwrap();
        store.retire("output/Show/ep2.mp3", false).unwrap();

        let content = std::fs::read_to_string(&file).unwrap();
        assert_eq!(content, "output/Show/ep1.mp3\noutput/Show/ep2.mp3\n");
    }

    #[test]
    fn retire_is_idempotent() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("retired_paths.txt");

        let mut store = RetireStore::load(&file).unwrap();
        assert_eq!(
            store.retire("output/Show/ep1.mp3", false).unwrap(),
            RetireOutcome::Added
        );
        assert_eq!(
            store.retire("output/Show/ep1.mp3", false).unwrap(),
            RetireOutcome::AlreadyRetired
        );

        assert_eq!(store.len(), 1);
        let content = std::fs::read_to_string(&file).unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn load_round_trips_existing_entries() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("retired_paths.txt");
        std::fs::write(&file, "a.mp3\nb.mp3\n").unwrap();

        let store = RetireStore::load(&file).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.contains("a.mp3"));
        assert!(store.contains("b.mp3"));
        assert!(!store.contains("c.mp3"));
    }

    #[test]
    fn retire_with_delete_removes_media_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("retired_paths.txt");
        let media = dir.path().join("episode.mp3");
        std::fs::write(&media, b"audio").unwrap();

        let mut store = RetireStore::load(&file).unwrap();
        let media_str = media.to_string_lossy().to_string();
        store.retire(&media_str, true).unwrap();

        assert!(!media.exists());
        assert!(store.contains(&media_str));
    }

    #[test]
    fn retire_with_delete_tolerates_missing_media() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("retired_paths.txt");

        let mut store = RetireStore::load(&file).unwrap();
        let outcome = store.retire("does/not/exist.mp3", true).unwrap();
        assert_eq!(outcome, RetireOutcome::Added);
        assert!(store.contains("does/not/exist.mp3"));
    }

    #[test]
    fn list_is_written_before_delete_is_attempted() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("retired_paths.txt");
        // A directory cannot be removed with remove_file, forcing the delete
        // step to fail after the list write
        let media = dir.path().join("stubborn");
        std::fs::create_dir(&media).unwrap();

        let mut store = RetireStore::load(&file).unwrap();
        let media_str = media.to_string_lossy().to_string();
        let result = store.retire(&media_str, true);

        assert!(matches!(result, Err(RetireError::DeleteFailed { .. })));
        let content = std::fs::read_to_string(&file).unwrap();
        assert!(content.contains(&media_str));
    }
}
