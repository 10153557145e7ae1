//! Output formatting and styling.
//!
//! Centralizes all CLI output: colored status lines, summary tables, the
//! stats panel, and progress-bar construction. Keeping the formatting here
//! means the rest of the crate never calls `println!` directly.

use crate::stats::{FolderStats, format_size};
use crate::undo::UndoReport;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;

/// Manages all CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Success line, green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Error line to stderr, red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Warning line, yellow.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Informational line, cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Unstyled line.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Bold section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Yellow dry-run marker line.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Progress bar for archive writing. The length is set lazily by the
    /// first progress callback, once the archiver has counted its entries.
    pub fn create_progress_bar() -> ProgressBar {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Per-category summary table for an organize run (or plan).
    pub fn summary_table(category_counts: &HashMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let mut categories: Vec<_> = category_counts.iter().collect();
        categories.sort_by_key(|&(name, _)| name);

        let width = categories
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!("{:<width$} | {}", "Category".bold(), "Files".bold());
        println!("{}", "-".repeat(width + 10));
        for (category, count) in &categories {
            let file_word = if **count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                file_word
            );
        }
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            if total_files == 1 { "file" } else { "files" }
        );
    }

    /// Stats panel. `None` renders every field as unavailable.
    pub fn stats_table(stats: Option<&FolderStats>) {
        Self::header("FOLDER STATISTICS");
        match stats {
            Some(stats) => {
                println!("  Files:      {}", stats.file_count.to_string().green());
                println!("  Folders:    {}", stats.folder_count.to_string().green());
                println!("  Total size: {}", format_size(stats.total_bytes).green());
                println!("  Max depth:  {}", stats.max_depth.to_string().green());
            }
            None => {
                for label in ["Files:     ", "Folders:   ", "Total size:", "Max depth: "] {
                    println!("  {} {}", label, "-".red());
                }
            }
        }
    }

    /// Outcome lines for an undo run.
    pub fn undo_report(report: &UndoReport) {
        if report.nothing_to_undo {
            Self::warning("Nothing to undo.");
            return;
        }

        Self::success(&format!("Restored: {}", report.restored));
        if !report.diverted.is_empty() {
            Self::warning(&format!(
                "Diverted (original path was taken): {}",
                report.diverted.len()
            ));
            for (intended, actual) in &report.diverted {
                println!("    {} → {}", intended.display(), actual.display());
            }
        }
        if !report.skipped.is_empty() {
            Self::warning(&format!("Skipped (no longer present): {}", report.skipped.len()));
            for path in &report.skipped {
                println!("    {}", path.display());
            }
        }
        if !report.failed.is_empty() {
            Self::error(&format!("Failed: {}", report.failed.len()));
            for (path, reason) in &report.failed {
                eprintln!("    {}: {}", path.display(), reason);
            }
        }
        if report.removed_folders > 0 {
            Self::plain(&format!(
                "Removed {} empty category folder{}.",
                report.removed_folders,
                if report.removed_folders == 1 { "" } else { "s" }
            ));
        }
    }
}
