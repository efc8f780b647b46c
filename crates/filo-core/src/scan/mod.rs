//! Directory scanning
//!
//! Produces the transient file records the classifier consumes. Hidden
//! entries, OS metadata, VCS directories, build caches and anything already
//! organized are filtered out.

use crate::error::{FiloError, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

/// Names skipped during scanning
const SKIP_NAMES: &[&str] = &[
    ".DS_Store",
    "Thumbs.db",
    "desktop.ini",
    "$RECYCLE.BIN",
    ".git",
    ".svn",
    "__pycache__",
    "node_modules",
    ".idea",
    ".vscode",
    ".Trash",
    ".filo",
];

/// Paths containing these substrings were produced by a previous run
const ORGANIZED_MARKERS: &[&str] = &["\u{5df2}\u{6574}\u{7406}", "Organized"];

/// One scanned entry
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub name: String,
    /// Lowercased, with leading dot; empty when absent
    pub extension: String,
    pub size: u64,
    pub modified: SystemTime,
    pub is_dir: bool,
}

/// Scan a directory, optionally descending into subdirectories
pub fn scan_directory(dir: &Path, recursive: bool) -> Result<Vec<FileRecord>> {
    if !dir.is_dir() {
        return Err(FiloError::DirectoryNotFound(dir.display().to_string()));
    }

    let mut walker = WalkDir::new(dir);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker.into_iter().filter_entry(keep_entry) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!("skipping entry without metadata: {}", e);
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        files.push(FileRecord {
            path: entry.path().to_path_buf(),
            extension: crate::classify::extension_of(&name),
            name,
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            is_dir: metadata.is_dir(),
        });
    }

    Ok(files)
}

fn keep_entry(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }

    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return false;
    }
    if SKIP_NAMES.iter().any(|s| name == *s) {
        return false;
    }

    let path = entry.path().to_string_lossy();
    !ORGANIZED_MARKERS.iter().any(|m| path.contains(m))
}

/// Per-extension aggregate
#[derive(Debug, Clone)]
pub struct ExtensionStat {
    pub extension: String,
    pub count: usize,
    pub size: u64,
}

/// Summary of a scan
#[derive(Debug, Clone, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub total_dirs: usize,
    pub total_size: u64,
    /// Sorted by descending count
    pub by_extension: Vec<ExtensionStat>,
}

/// Aggregate scan records into counts and sizes per extension
pub fn collect_statistics(files: &[FileRecord]) -> ScanStatistics {
    let mut stats = ScanStatistics::default();
    let mut by_ext: std::collections::HashMap<String, (usize, u64)> =
        std::collections::HashMap::new();

    for f in files {
        if f.is_dir {
            stats.total_dirs += 1;
            continue;
        }
        stats.total_files += 1;
        stats.total_size += f.size;

        let ext = if f.extension.is_empty() {
            "(none)".to_string()
        } else {
            f.extension.clone()
        };
        let entry = by_ext.entry(ext).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += f.size;
    }

    stats.by_extension = by_ext
        .into_iter()
        .map(|(extension, (count, size))| ExtensionStat {
            extension,
            count,
            size,
        })
        .collect();
    stats
        .by_extension
        .sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.extension.cmp(&b.extension)));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_scan_filters_hidden_and_skip_names() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("report.pdf"));
        touch(&dir.path().join(".hidden"));
        touch(&dir.path().join(".DS_Store"));
        fs::create_dir(dir.path().join(".git")).unwrap();
        touch(&dir.path().join(".git").join("config"));

        let files = scan_directory(dir.path(), true).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["report.pdf"]);
    }

    #[test]
    fn test_scan_skips_organized_output() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.txt"));
        fs::create_dir(dir.path().join("Organized")).unwrap();
        touch(&dir.path().join("Organized").join("b.txt"));

        let files = scan_directory(dir.path(), true).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "a.txt");
    }

    #[test]
    fn test_scan_non_recursive_stays_at_first_level() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("top.txt"));
        fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub").join("nested.txt"));

        let flat = scan_directory(dir.path(), false).unwrap();
        let names: Vec<&str> = flat.iter().map(|f| f.name.as_str()).collect();
        assert!(names.contains(&"top.txt"));
        assert!(names.contains(&"sub"));
        assert!(!names.contains(&"nested.txt"));

        let deep = scan_directory(dir.path(), true).unwrap();
        assert!(deep.iter().any(|f| f.name == "nested.txt"));
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(scan_directory(&missing, false).is_err());
    }

    #[test]
    fn test_extension_lowercased_with_dot() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("Photo.JPG"));

        let files = scan_directory(dir.path(), false).unwrap();
        assert_eq!(files[0].extension, ".jpg");
    }

    #[test]
    fn test_statistics() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.txt"));
        touch(&dir.path().join("b.txt"));
        touch(&dir.path().join("c.jpg"));
        fs::create_dir(dir.path().join("sub")).unwrap();

        let files = scan_directory(dir.path(), true).unwrap();
        let stats = collect_statistics(&files);
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_dirs, 1);
        assert_eq!(stats.by_extension[0].extension, ".txt");
        assert_eq!(stats.by_extension[0].count, 2);
    }
}
