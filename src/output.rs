//! Output formatting and styling module.
//!
//! Centralizes all operator-facing output: per-row diagnostic lines, the
//! per-category summary table, and the progress bar shown while a pass runs.

use crate::tree::{ContentTree, ResolvedEntry, UnresolvedRow};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// One diagnostic line per resolved entry, echoing the resolved pair.
    pub fn resolved_line(category: &str, entry: &ResolvedEntry) {
        Self::success(&format!(
            "{}: \"{}\" -> {}",
            category, entry.title, entry.file
        ));
    }

    /// One diagnostic line per unresolved row, echoing the attempted
    /// candidate prefixes for operator follow-up.
    pub fn unresolved_line(row: &UnresolvedRow) {
        Self::warning(&format!(
            "{}: \"{}\" matched no file (tried {:?})",
            row.category, row.title, row.prefixes
        ));
    }

    /// Progress bar for the row-resolution loop.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} rows {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Per-category summary of the pass, with an unresolved-row footer.
    pub fn summary_table(tree: &ContentTree, unresolved: usize) {
        Self::header("SUMMARY");

        let max_category_len = tree
            .groups()
            .iter()
            .map(|group| group.category.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Entries".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for group in tree.groups() {
            let count = group.entries.len();
            let entry_word = if count == 1 { "entry" } else { "entries" };
            println!(
                "{:<width$} | {} {}",
                group.category,
                count.to_string().green(),
                entry_word,
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} resolved, {} unresolved",
            "Total".bold(),
            tree.entry_count().to_string().green().bold(),
            if unresolved == 0 {
                unresolved.to_string().green().to_string()
            } else {
                unresolved.to_string().yellow().to_string()
            },
            width = max_category_len
        );
    }
}
