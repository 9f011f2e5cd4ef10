//! Filtering of candidate day directories and listing of their log files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{PeakError, Result};

/// Keeps only the candidates that exist as directories, preserving order.
///
/// A missing day is routine (nothing was recorded that day) and is logged,
/// never treated as a failure.
pub fn retain_existing_directories(candidates: Vec<PathBuf>) -> (Vec<PathBuf>, usize) {
    let mut missing = 0;

    let valid = candidates
        .into_iter()
        .filter(|path| {
            let exists = path.is_dir();
            if !exists {
                warn!(path = %path.display(), "day directory does not exist");
                missing += 1;
            }
            exists
        })
        .collect();

    (valid, missing)
}

/// Lists the regular files directly inside `directory`, sorted by path.
///
/// No naming pattern is assumed; every file is a log file. Subdirectories
/// are ignored.
pub fn list_log_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(directory).map_err(|e| PeakError::io(directory, e))? {
        let entry = entry.map_err(|e| PeakError::io(directory, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn drops_missing_and_keeps_order() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        fs::create_dir(&a).unwrap();
        fs::create_dir(&b).unwrap();

        let candidates = vec![b.clone(), tmp.path().join("missing"), a.clone()];
        let (valid, missing) = retain_existing_directories(candidates);

        assert_eq!(valid, vec![b, a]);
        assert_eq!(missing, 1);
    }

    #[test]
    fn plain_file_is_not_a_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("15");
        fs::write(&file, "x").unwrap();

        let (valid, missing) = retain_existing_directories(vec![file]);
        assert!(valid.is_empty());
        assert_eq!(missing, 1);
    }

    #[test]
    fn lists_only_files_sorted() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.log"), "").unwrap();
        fs::write(tmp.path().join("a"), "").unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();

        let files = list_log_files(tmp.path()).unwrap();
        assert_eq!(files, vec![tmp.path().join("a"), tmp.path().join("b.log")]);
    }

    #[test]
    fn listing_missing_directory_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = list_log_files(&tmp.path().join("gone")).unwrap_err();
        assert!(matches!(err, PeakError::Io { .. }));
    }
}
