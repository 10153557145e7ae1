//! Command-line interface.
//!
//! The CLI is the host collaborator around the core engine: it parses
//! arguments, loads the exclusion configuration, renders reports, and owns
//! the one live [`MoveLedger`]. One-shot subcommands cover organize, stats,
//! recent and archive; running without a subcommand opens an interactive
//! session whose action loop also offers `undo`. Undo only makes sense
//! there: the ledger lives and dies with the process, so a fresh invocation
//! never has anything to revert.

use crate::archive::Archiver;
use crate::category::CategoryRules;
use crate::config::{CompiledFilters, FilterConfig};
use crate::organizer::{MoveLedger, OrganizeError, Organizer};
use crate::output::OutputFormatter;
use crate::stats::StatsCollector;
use crate::undo::UndoManager;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "dirshelf",
    version,
    about = "Sort a directory's files into category subfolders, reversibly."
)]
pub struct Cli {
    /// Directory to operate on.
    pub path: PathBuf,

    /// Exclusion-rule configuration file (TOML).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// One-shot action; omit for an interactive session.
    #[command(subcommand)]
    pub action: Option<Action>,
}

/// One-shot actions.
#[derive(Debug, Subcommand)]
pub enum Action {
    /// Sort the directory's immediate files into category subfolders.
    Organize {
        /// Show what would move without touching anything.
        #[arg(long)]
        dry_run: bool,
    },
    /// Show folder statistics.
    Stats {
        /// Print the statistics as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List files modified within the last days.
    Recent {
        /// Look-back window in days.
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// Zip the whole tree into a sibling archive.
    Archive,
}

/// Runs the CLI with parsed arguments.
pub fn run(cli: Cli) -> Result<(), String> {
    let filters = FilterConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?
        .compile()
        .map_err(|e| format!("Error compiling filters: {}", e))?;

    let mut session = Session::new(cli.path, filters);
    match cli.action {
        Some(Action::Organize { dry_run }) => session.organize(dry_run),
        Some(Action::Stats { json }) => session.stats(json),
        Some(Action::Recent { days }) => session.recent(days),
        Some(Action::Archive) => session.archive(),
        None => session.run_interactive(),
    }
}

/// A command typed into the interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionCommand {
    Organize,
    DryRun,
    Undo,
    Stats,
    Recent(u32),
    Archive,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parses one input line. Returns `None` for anything unrecognized.
    fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = match words.next()? {
            "organize" => Self::Organize,
            "dry-run" | "dryrun" => Self::DryRun,
            "undo" => Self::Undo,
            "stats" => Self::Stats,
            "recent" => {
                let days = match words.next() {
                    Some(raw) => raw.parse().ok()?,
                    None => 7,
                };
                Self::Recent(days)
            }
            "archive" => Self::Archive,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => return None,
        };
        if words.next().is_some() {
            return None;
        }
        Some(command)
    }
}

/// One run against a single directory, owning the live ledger.
///
/// At most one ledger is live at a time: every organize replaces it
/// (last-organize-wins), and undo takes it away.
pub struct Session {
    root: PathBuf,
    rules: CategoryRules,
    filters: CompiledFilters,
    ledger: Option<MoveLedger>,
}

impl Session {
    /// Creates a session with an empty ledger slot.
    pub fn new(root: PathBuf, filters: CompiledFilters) -> Self {
        Self {
            root,
            rules: CategoryRules::default(),
            filters,
            ledger: None,
        }
    }

    /// Whether an organize run is currently undoable.
    pub fn has_ledger(&self) -> bool {
        self.ledger.is_some()
    }

    /// Organizes the directory, or previews the plan when `dry_run` is set.
    ///
    /// A move failure mid-batch keeps the partial ledger, so the completed
    /// portion stays undoable from the same session.
    pub fn organize(&mut self, dry_run: bool) -> Result<(), String> {
        if dry_run {
            return self.preview();
        }

        OutputFormatter::info(&format!("Organizing contents of: {}", self.root.display()));
        match Organizer::organize(&self.root, &self.rules, &self.filters) {
            Ok(report) => {
                if report.ledger.is_empty() {
                    OutputFormatter::plain("No files to organize.");
                } else {
                    for record in report.ledger.records() {
                        let name = record
                            .original
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_default();
                        OutputFormatter::plain(&format!(
                            " - {} → {}/",
                            name,
                            record.category.dir_name()
                        ));
                    }
                    OutputFormatter::summary_table(&report.category_counts, report.moved());
                }
                OutputFormatter::success("Organization complete!");
                self.ledger = Some(report.ledger);
                Ok(())
            }
            Err(OrganizeError::MoveFailure { error, completed }) => {
                let message = format!(
                    "Organization aborted: {} ({} completed moves remain undoable)",
                    error,
                    completed.len()
                );
                self.ledger = Some(completed);
                Err(message)
            }
            Err(e) => Err(e.to_string()),
        }
    }

    fn preview(&self) -> Result<(), String> {
        OutputFormatter::dry_run_notice(&format!(
            "Analyzing contents of: {}",
            self.root.display()
        ));
        let planned = Organizer::plan(&self.root, &self.rules, &self.filters)
            .map_err(|e| e.to_string())?;

        if planned.is_empty() {
            OutputFormatter::plain("No files to organize.");
            return Ok(());
        }

        let mut counts: HashMap<String, usize> = HashMap::new();
        for planned_move in &planned {
            OutputFormatter::plain(&format!(
                " - {} → {}/",
                planned_move.name,
                planned_move.category.dir_name()
            ));
            *counts
                .entry(planned_move.category.dir_name().to_string())
                .or_insert(0) += 1;
        }
        OutputFormatter::summary_table(&counts, planned.len());
        OutputFormatter::success("Dry run complete. No files were modified.");
        Ok(())
    }

    /// Reverses the most recent organize run, if any.
    pub fn undo(&mut self) -> Result<(), String> {
        match self.ledger.take() {
            None => {
                OutputFormatter::warning("Nothing to undo.");
                Ok(())
            }
            Some(ledger) => {
                let report = UndoManager::undo(ledger, &self.rules);
                OutputFormatter::undo_report(&report);
                Ok(())
            }
        }
    }

    /// Shows folder statistics, as a table or as JSON.
    pub fn stats(&self, json: bool) -> Result<(), String> {
        match StatsCollector::collect(&self.root) {
            Ok(stats) => {
                if json {
                    let rendered =
                        serde_json::to_string_pretty(&stats).map_err(|e| e.to_string())?;
                    OutputFormatter::plain(&rendered);
                } else {
                    OutputFormatter::stats_table(Some(&stats));
                }
                Ok(())
            }
            Err(e) if json => Err(e.to_string()),
            Err(e) => {
                OutputFormatter::stats_table(None);
                OutputFormatter::error(&e.to_string());
                Ok(())
            }
        }
    }

    /// Lists files modified within the last `days` days.
    pub fn recent(&self, days: u32) -> Result<(), String> {
        let names =
            StatsCollector::recently_modified(&self.root, days).map_err(|e| e.to_string())?;

        if names.is_empty() {
            OutputFormatter::plain(&format!("No files modified in the last {} days.", days));
        } else {
            OutputFormatter::header(&format!("Modified in the last {} days", days));
            for name in &names {
                OutputFormatter::plain(&format!(" - {}", name));
            }
        }
        Ok(())
    }

    /// Archives the directory tree with a live progress bar.
    pub fn archive(&self) -> Result<(), String> {
        OutputFormatter::info(&format!("Archiving: {}", self.root.display()));
        let progress = OutputFormatter::create_progress_bar();

        let result = Archiver::archive(&self.root, |completed, total| {
            progress.set_length(total as u64);
            progress.set_position(completed as u64);
        });

        match result {
            Ok(zip_path) => {
                progress.finish_and_clear();
                OutputFormatter::success(&format!("Archive written to {}", zip_path.display()));
                Ok(())
            }
            Err(e) => {
                progress.abandon();
                Err(e.to_string())
            }
        }
    }

    /// The interactive action loop. Reads commands from stdin until `quit`
    /// or end of input.
    pub fn run_interactive(&mut self) -> Result<(), String> {
        OutputFormatter::info(&format!("dirshelf session on {}", self.root.display()));
        Self::print_help();

        let stdin = io::stdin();
        loop {
            print!("dirshelf> ");
            io::stdout().flush().ok();

            let mut line = String::new();
            match stdin.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => return Err(format!("Failed to read input: {}", e)),
            }
            if line.trim().is_empty() {
                continue;
            }

            match SessionCommand::parse(&line) {
                Some(SessionCommand::Quit) => break,
                Some(command) => {
                    if let Err(e) = self.dispatch(command) {
                        OutputFormatter::error(&e);
                    }
                }
                None => OutputFormatter::warning("Unknown command; type 'help' for the list."),
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, command: SessionCommand) -> Result<(), String> {
        match command {
            SessionCommand::Organize => self.organize(false),
            SessionCommand::DryRun => self.organize(true),
            SessionCommand::Undo => self.undo(),
            SessionCommand::Stats => self.stats(false),
            SessionCommand::Recent(days) => self.recent(days),
            SessionCommand::Archive => self.archive(),
            SessionCommand::Help => {
                Self::print_help();
                Ok(())
            }
            SessionCommand::Quit => Ok(()),
        }
    }

    fn print_help() {
        OutputFormatter::header("Available actions");
        OutputFormatter::plain("  organize        sort files into category folders");
        OutputFormatter::plain("  dry-run         preview the organize without moving anything");
        OutputFormatter::plain("  undo            reverse the most recent organize");
        OutputFormatter::plain("  stats           show folder statistics");
        OutputFormatter::plain("  recent [DAYS]   list recently modified files (default 7 days)");
        OutputFormatter::plain("  archive         zip the whole tree");
        OutputFormatter::plain("  help            show this list");
        OutputFormatter::plain("  quit            leave the session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn new_session(root: &std::path::Path) -> Session {
        let filters = FilterConfig::default()
            .compile()
            .expect("Default filters must compile");
        Session::new(root.to_path_buf(), filters)
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(SessionCommand::parse("organize"), Some(SessionCommand::Organize));
        assert_eq!(SessionCommand::parse("  undo  "), Some(SessionCommand::Undo));
        assert_eq!(SessionCommand::parse("dry-run"), Some(SessionCommand::DryRun));
        assert_eq!(SessionCommand::parse("archive"), Some(SessionCommand::Archive));
        assert_eq!(SessionCommand::parse("quit"), Some(SessionCommand::Quit));
        assert_eq!(SessionCommand::parse("exit"), Some(SessionCommand::Quit));
    }

    #[test]
    fn test_parse_recent_with_and_without_days() {
        assert_eq!(SessionCommand::parse("recent"), Some(SessionCommand::Recent(7)));
        assert_eq!(SessionCommand::parse("recent 30"), Some(SessionCommand::Recent(30)));
        assert_eq!(SessionCommand::parse("recent soon"), None);
    }

    #[test]
    fn test_parse_rejects_unknown_and_trailing_input() {
        assert_eq!(SessionCommand::parse("shuffle"), None);
        assert_eq!(SessionCommand::parse("organize now"), None);
    }

    #[test]
    fn test_session_organize_then_undo_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("a.jpg"), "img").expect("Failed to write file");
        let mut session = new_session(temp_dir.path());

        session.organize(false).expect("Organize failed");
        assert!(session.has_ledger());
        assert!(temp_dir.path().join("Images").join("a.jpg").exists());

        session.undo().expect("Undo failed");
        assert!(!session.has_ledger());
        assert!(temp_dir.path().join("a.jpg").exists());
        assert!(!temp_dir.path().join("Images").exists());
    }

    #[test]
    fn test_session_undo_without_ledger_is_soft() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut session = new_session(temp_dir.path());

        assert!(session.undo().is_ok());
    }

    #[test]
    fn test_session_dry_run_keeps_ledger_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("a.jpg"), "img").expect("Failed to write file");
        let mut session = new_session(temp_dir.path());

        session.organize(true).expect("Dry run failed");

        assert!(!session.has_ledger());
        assert!(temp_dir.path().join("a.jpg").exists());
        assert!(!temp_dir.path().join("Images").exists());
    }

    #[test]
    fn test_new_organize_replaces_previous_ledger() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("a.jpg"), "img").expect("Failed to write file");
        let mut session = new_session(temp_dir.path());

        session.organize(false).expect("Organize failed");
        fs::write(temp_dir.path().join("b.txt"), "txt").expect("Failed to write file");
        session.organize(false).expect("Organize failed");

        // Undo reverses only the second run: a.jpg stays shelved.
        session.undo().expect("Undo failed");
        assert!(temp_dir.path().join("b.txt").exists());
        assert!(temp_dir.path().join("Images").join("a.jpg").exists());
    }
}
