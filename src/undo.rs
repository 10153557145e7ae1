//! Reversal of an organize run.
//!
//! Undo consumes a [`MoveLedger`] by value and replays its records in
//! reverse insertion order, moving each file from its recorded destination
//! back to its recorded original path. Restores never overwrite: a
//! reoccupied original path diverts the restore to a collision-resolved
//! sibling name, and the diversion is reported instead of losing data.
//! Afterwards every declared category folder under the ledger root is
//! removed if (and only if) it ended up empty.

use crate::category::CategoryRules;
use crate::mover::resolve_collision;
use crate::organizer::{MoveLedger, MoveRecord};
use std::fs;
use std::path::PathBuf;

/// What happened during an undo run.
///
/// "Nothing to undo" is a successful outcome, not an error; check
/// [`UndoReport::nothing_to_undo`]. The consumed ledger is gone either way,
/// so a partially failed undo cannot be replayed.
#[derive(Debug)]
pub struct UndoReport {
    /// The undo was called with an empty ledger.
    pub nothing_to_undo: bool,
    /// Files moved back to their exact original path.
    pub restored: usize,
    /// Restores whose original path was reoccupied: `(intended, actual)`.
    pub diverted: Vec<(PathBuf, PathBuf)>,
    /// Records whose destination no longer existed; nothing to move.
    pub skipped: Vec<PathBuf>,
    /// Restores that failed at the filesystem level: `(destination, reason)`.
    pub failed: Vec<(PathBuf, String)>,
    /// Category folders removed because they were left empty.
    pub removed_folders: usize,
}

impl UndoReport {
    fn empty() -> Self {
        Self {
            nothing_to_undo: false,
            restored: 0,
            diverted: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
            removed_folders: 0,
        }
    }

    /// True when every record was restored to its exact original path.
    pub fn is_complete_success(&self) -> bool {
        !self.nothing_to_undo
            && self.diverted.is_empty()
            && self.skipped.is_empty()
            && self.failed.is_empty()
    }
}

/// Reverses organize runs recorded in a [`MoveLedger`].
pub struct UndoManager;

impl UndoManager {
    /// Undoes the organize run recorded in `ledger`.
    ///
    /// Records are replayed in reverse insertion order, which guarantees
    /// that collision renames performed during the organize cannot clash
    /// with earlier restores. Taking the ledger by value is what clears it:
    /// once undo returns, the run can no longer be replayed, regardless of
    /// how many individual restores were skipped or failed.
    ///
    /// # Edge cases
    ///
    /// * Empty ledger: soft success, reported via `nothing_to_undo`.
    /// * Destination vanished: the record is skipped and reported.
    /// * Original path reoccupied: the restore is diverted to a
    ///   `stem_copyN.ext` sibling and reported; nothing is overwritten.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirshelf::category::CategoryRules;
    /// use dirshelf::config::FilterConfig;
    /// use dirshelf::organizer::Organizer;
    /// use dirshelf::undo::UndoManager;
    /// use std::path::Path;
    ///
    /// let rules = CategoryRules::default();
    /// let filters = FilterConfig::default().compile().unwrap();
    /// let report = Organizer::organize(Path::new("/tmp/downloads"), &rules, &filters)?;
    /// let undone = UndoManager::undo(report.ledger, &rules);
    /// println!("restored {} files", undone.restored);
    /// # Ok::<(), dirshelf::organizer::OrganizeError>(())
    /// ```
    pub fn undo(ledger: MoveLedger, rules: &CategoryRules) -> UndoReport {
        let mut report = UndoReport::empty();

        if ledger.is_empty() {
            report.nothing_to_undo = true;
            return report;
        }

        for record in ledger.records().iter().rev() {
            Self::restore_record(record, &mut report);
        }

        // Prune the category folders this run may have created, but only
        // the ones that ended up empty.
        for category in rules.categories() {
            let folder = ledger.root().join(category.dir_name());
            if folder.is_dir() && Self::is_empty_dir(&folder) && fs::remove_dir(&folder).is_ok() {
                report.removed_folders += 1;
            }
        }

        report
    }

    /// Moves one record back to its original location, never overwriting.
    fn restore_record(record: &MoveRecord, report: &mut UndoReport) {
        if !record.destination.exists() {
            report.skipped.push(record.destination.clone());
            return;
        }

        let target = resolve_collision(&record.original);
        match fs::rename(&record.destination, &target) {
            Ok(()) if target == record.original => report.restored += 1,
            Ok(()) => report.diverted.push((record.original.clone(), target)),
            Err(e) => report
                .failed
                .push((record.destination.clone(), e.to_string())),
        }
    }

    fn is_empty_dir(path: &std::path::Path) -> bool {
        fs::read_dir(path)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false)
    }
}
