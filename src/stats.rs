//! Folder statistics: counts, total size, and tree depth.
//!
//! Everything here is read-only and computed fresh on each request. The
//! displayed file count applies the presentational `.ini` exclusion from
//! [`crate::category::is_stats_excluded`]; the recursive byte sum and depth
//! walk look at everything.

use crate::category::is_stats_excluded;
use chrono::{DateTime, Duration, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A snapshot of a directory's statistics.
///
/// Never cached and never mutated after construction. Serializes to JSON
/// for the `stats --json` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderStats {
    /// Immediate files at depth 1, minus the `.ini` display exclusions.
    pub file_count: usize,
    /// Immediate subdirectories at depth 1.
    pub folder_count: usize,
    /// Bytes of every file at any depth, exclusions included.
    pub total_bytes: u64,
    /// Depth of the deepest subdirectory relative to the root.
    pub max_depth: usize,
}

/// Statistics collection failed as a whole.
///
/// This is the explicit error-state result: the caller renders every field
/// as unavailable instead of showing partial numbers. Individual per-file
/// stat failures never produce this; they just contribute zero.
#[derive(Debug)]
pub enum StatsError {
    /// The root could not be read at all.
    Unavailable { path: PathBuf, reason: String },
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable { path, reason } => {
                write!(
                    f,
                    "Statistics unavailable for {}: {}",
                    path.display(),
                    reason
                )
            }
        }
    }
}

impl std::error::Error for StatsError {}

/// Read-only statistics collector.
pub struct StatsCollector;

impl StatsCollector {
    /// Computes [`FolderStats`] for a directory.
    ///
    /// Immediate files and folders are counted at depth 1; the byte sum and
    /// maximum depth come from a full recursive walk. A file whose metadata
    /// cannot be read counts zero bytes rather than failing the whole
    /// computation; only an unreadable root yields
    /// [`StatsError::Unavailable`].
    pub fn collect(root: &Path) -> Result<FolderStats, StatsError> {
        let entries = fs::read_dir(root).map_err(|e| StatsError::Unavailable {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut file_count = 0;
        let mut folder_count = 0;
        for entry in entries.flatten() {
            if let Ok(file_type) = entry.file_type() {
                if file_type.is_dir() {
                    folder_count += 1;
                } else if file_type.is_file() {
                    let name = entry.file_name().to_string_lossy().to_string();
                    if !is_stats_excluded(&name) {
                        file_count += 1;
                    }
                }
            }
        }

        let mut total_bytes = 0u64;
        let mut max_depth = 0usize;
        for entry in WalkDir::new(root) {
            match entry {
                Ok(entry) if entry.depth() == 0 => {}
                Ok(entry) => {
                    if entry.file_type().is_dir() {
                        max_depth = max_depth.max(entry.depth());
                    } else if entry.file_type().is_file() {
                        // Unreadable metadata contributes zero bytes.
                        total_bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
                    }
                }
                Err(e) if e.depth() == 0 => {
                    return Err(StatsError::Unavailable {
                        path: root.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
                Err(_) => {}
            }
        }

        Ok(FolderStats {
            file_count,
            folder_count,
            total_bytes,
            max_depth,
        })
    }

    /// Names of immediate files modified within the last `days` days,
    /// sorted by name.
    pub fn recently_modified(root: &Path, days: u32) -> Result<Vec<String>, StatsError> {
        let entries = fs::read_dir(root).map_err(|e| StatsError::Unavailable {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;

        let cutoff = Local::now() - Duration::days(i64::from(days));
        let mut recent = Vec::new();
        for entry in entries.flatten() {
            if let Ok(file_type) = entry.file_type()
                && file_type.is_file()
                && let Ok(metadata) = entry.metadata()
                && let Ok(modified) = metadata.modified()
            {
                let modified: DateTime<Local> = modified.into();
                if modified > cutoff {
                    recent.push(entry.file_name().to_string_lossy().to_string());
                }
            }
        }
        recent.sort();

        Ok(recent)
    }
}

/// Formats a byte count for display using binary units with the common
/// short labels.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else if b < GB {
        format!("{:.1} MB", b / MB)
    } else {
        format!("{:.2} GB", b / GB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_empty_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let stats = StatsCollector::collect(temp_dir.path()).expect("Collect failed");

        assert_eq!(
            stats,
            FolderStats {
                file_count: 0,
                folder_count: 0,
                total_bytes: 0,
                max_depth: 0,
            }
        );
    }

    #[test]
    fn test_collect_counts_sizes_and_depth() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("a.txt"), [0u8; 10]).expect("Failed to write file");
        fs::write(temp_dir.path().join("b.txt"), [0u8; 20]).expect("Failed to write file");
        fs::write(temp_dir.path().join("c.txt"), [0u8; 30]).expect("Failed to write file");
        fs::create_dir(temp_dir.path().join("empty")).expect("Failed to create directory");

        let stats = StatsCollector::collect(temp_dir.path()).expect("Collect failed");

        assert_eq!(stats.file_count, 3);
        assert_eq!(stats.folder_count, 1);
        assert_eq!(stats.total_bytes, 60);
        assert_eq!(stats.max_depth, 1);
    }

    #[test]
    fn test_collect_display_count_excludes_ini_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("a.txt"), [0u8; 5]).expect("Failed to write file");
        fs::write(temp_dir.path().join("Desktop.ini"), [0u8; 7]).expect("Failed to write file");
        fs::write(temp_dir.path().join("settings.INI"), [0u8; 9]).expect("Failed to write file");

        let stats = StatsCollector::collect(temp_dir.path()).expect("Collect failed");

        // Excluded from the count, still weighed in the byte sum.
        assert_eq!(stats.file_count, 1);
        assert_eq!(stats.total_bytes, 21);
    }

    #[test]
    fn test_collect_size_is_recursive() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).expect("Failed to create directories");
        fs::write(nested.join("deep.bin"), [0u8; 100]).expect("Failed to write file");

        let stats = StatsCollector::collect(temp_dir.path()).expect("Collect failed");

        assert_eq!(stats.file_count, 0);
        assert_eq!(stats.folder_count, 1);
        assert_eq!(stats.total_bytes, 100);
        assert_eq!(stats.max_depth, 2);
    }

    #[test]
    fn test_collect_missing_root_is_unavailable() {
        let result = StatsCollector::collect(Path::new("/non/existent/path"));
        assert!(matches!(result, Err(StatsError::Unavailable { .. })));
    }

    #[test]
    fn test_recently_modified_finds_fresh_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("fresh.txt"), "now").expect("Failed to write file");
        fs::create_dir(temp_dir.path().join("subdir")).expect("Failed to create directory");

        let recent =
            StatsCollector::recently_modified(temp_dir.path(), 7).expect("Recent scan failed");

        assert_eq!(recent, vec!["fresh.txt".to_string()]);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }
}
