//! Directory organization: classify, move, and record.
//!
//! This module walks a directory's immediate entries, classifies each
//! regular file via [`CategoryRules`], moves it into its category subfolder
//! through the collision-safe mover, and records every move in a
//! [`MoveLedger`]. The ledger is an explicit value returned to the caller;
//! threading it into [`crate::undo::UndoManager::undo`] reverses the run.
//!
//! Only immediate entries are considered: files already inside category
//! subfolders from an earlier run are never re-classified, which makes
//! repeated organize calls safe on partially-organized trees.

use crate::category::{Category, CategoryRules, is_organize_excluded};
use crate::config::CompiledFilters;
use crate::mover::{self, MoveError};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A single recorded file move.
///
/// Both paths are absolute at the moment of the move. A record is owned by
/// exactly one ledger and is never shared.
#[derive(Debug, Clone)]
pub struct MoveRecord {
    /// Where the file landed (after collision resolution).
    pub destination: PathBuf,
    /// Where the file came from.
    pub original: PathBuf,
    /// The category the file was filed under.
    pub category: Category,
}

/// The ordered log of moves performed by one organize run.
///
/// Insertion order is significant: undo replays the records in reverse so
/// that collision renames inside category folders cannot clash with
/// restores. A ledger lives for the lifetime of the process at most; it is
/// consumed by value by a single undo call and never written to disk.
#[derive(Debug, Clone)]
pub struct MoveLedger {
    root: PathBuf,
    records: Vec<MoveRecord>,
}

impl MoveLedger {
    /// Creates an empty ledger rooted at the organized directory.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            records: Vec::new(),
        }
    }

    /// The directory the recorded organize ran against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The recorded moves, in insertion order.
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    /// Number of recorded moves.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the run moved nothing.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn record(&mut self, record: MoveRecord) {
        self.records.push(record);
    }
}

/// Errors that can occur while organizing a directory.
#[derive(Debug)]
pub enum OrganizeError {
    /// The target directory does not exist or is not a directory.
    DirectoryNotFound { path: PathBuf },
    /// The directory could not be enumerated.
    DirectoryReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A category subfolder could not be created.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A file move failed. The batch is aborted at this point; `completed`
    /// holds the moves that already happened so they remain undoable.
    MoveFailure {
        error: MoveError,
        completed: MoveLedger,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryNotFound { path } => {
                write!(f, "Directory not found: {}", path.display())
            }
            Self::DirectoryReadFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::MoveFailure { error, completed } => {
                write!(
                    f,
                    "{} ({} earlier moves remain undoable)",
                    error,
                    completed.len()
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for organize operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// One entry of an organize plan: a file and the category it resolves to.
#[derive(Debug, Clone)]
pub struct PlannedMove {
    /// The file name, for display.
    pub name: String,
    /// The file's current full path.
    pub path: PathBuf,
    /// The category it classifies into.
    pub category: Category,
}

/// Summary of a completed organize run.
#[derive(Debug)]
pub struct OrganizeReport {
    /// The ledger of every move performed; hand this to undo to reverse it.
    pub ledger: MoveLedger,
    /// Number of files moved per category folder name.
    pub category_counts: HashMap<String, usize>,
}

impl OrganizeReport {
    /// Total number of files moved.
    pub fn moved(&self) -> usize {
        self.ledger.len()
    }
}

/// Organizes files by moving them into category subdirectories.
pub struct Organizer;

impl Organizer {
    /// Scans a directory and classifies its immediate files without moving
    /// anything.
    ///
    /// Hidden files, `desktop.ini`, and anything matched by the configured
    /// exclusion filters are left out. Entries are sorted by file name so
    /// plans, ledgers and summaries are reproducible. This is the shared
    /// first half of both [`Organizer::organize`] and a dry run.
    pub fn plan(
        root: &Path,
        rules: &CategoryRules,
        filters: &CompiledFilters,
    ) -> OrganizeResult<Vec<PlannedMove>> {
        if !root.is_dir() {
            return Err(OrganizeError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        let entries = fs::read_dir(root).map_err(|e| OrganizeError::DirectoryReadFailed {
            path: root.to_path_buf(),
            source: e,
        })?;

        let mut planned = Vec::new();
        for entry in entries.flatten() {
            if let Ok(file_type) = entry.file_type()
                && file_type.is_file()
            {
                let name = entry.file_name().to_string_lossy().to_string();
                if is_organize_excluded(&name) || filters.is_excluded(&entry.path()) {
                    continue;
                }
                planned.push(PlannedMove {
                    category: rules.classify(&name),
                    path: entry.path(),
                    name,
                });
            }
        }
        planned.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(planned)
    }

    /// Organizes a directory's immediate files into category subfolders.
    ///
    /// One subfolder per declared category (the catch-all included) is
    /// created up front; pre-existing folders are left untouched, so
    /// re-running on an organized tree is safe and moves nothing. Every
    /// performed move is appended to the returned ledger.
    ///
    /// # Errors
    ///
    /// [`OrganizeError::DirectoryNotFound`] if `root` is not an existing
    /// directory. [`OrganizeError::MoveFailure`] if the underlying move
    /// primitive fails; the batch stops there and the error carries the
    /// ledger of moves completed so far.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirshelf::category::CategoryRules;
    /// use dirshelf::config::FilterConfig;
    /// use dirshelf::organizer::Organizer;
    /// use std::path::Path;
    ///
    /// let rules = CategoryRules::default();
    /// let filters = FilterConfig::default().compile().unwrap();
    /// let report = Organizer::organize(Path::new("/tmp/downloads"), &rules, &filters)?;
    /// println!("moved {} files", report.moved());
    /// # Ok::<(), dirshelf::organizer::OrganizeError>(())
    /// ```
    pub fn organize(
        root: &Path,
        rules: &CategoryRules,
        filters: &CompiledFilters,
    ) -> OrganizeResult<OrganizeReport> {
        let planned = Self::plan(root, rules, filters)?;

        for category in rules.categories() {
            let category_path = root.join(category.dir_name());
            if !category_path.exists() {
                fs::create_dir(&category_path).map_err(|e| {
                    OrganizeError::DirectoryCreationFailed {
                        path: category_path.clone(),
                        source: e,
                    }
                })?;
            }
        }

        let mut ledger = MoveLedger::new(root.to_path_buf());
        let mut category_counts: HashMap<String, usize> = HashMap::new();

        for planned_move in planned {
            let dir_name = planned_move.category.dir_name();
            let desired = root.join(dir_name).join(&planned_move.name);

            match mover::move_file(&planned_move.path, &desired) {
                Ok(destination) => {
                    ledger.record(MoveRecord {
                        destination,
                        original: planned_move.path,
                        category: planned_move.category,
                    });
                    *category_counts.entry(dir_name.to_string()).or_insert(0) += 1;
                }
                Err(error) => {
                    return Err(OrganizeError::MoveFailure {
                        error,
                        completed: ledger,
                    });
                }
            }
        }

        Ok(OrganizeReport {
            ledger,
            category_counts,
        })
    }
}
