//! Command-line orchestration for a reconciliation pass.
//!
//! This module wires the collaborators together:
//! - Configuration loading and compilation
//! - Catalog ingestion
//! - Resource-pool snapshotting
//! - Row classification and filename resolution
//! - Diagnostics, summary table, and the optional JSON report

use crate::catalog::Catalog;
use crate::classifier::RowClassifier;
use crate::config::{CompiledConfig, ConfigError, MatchConfig};
use crate::output::OutputFormatter;
use crate::resolver::FileResolver;
use crate::tree::{PassOutcome, ReconcileReport, ResolvedEntry, UnresolvedRow};
use indicatif::ProgressBar;
use std::fs;
use std::path::Path;

/// Runs reconciliation passes over a catalog and a pool snapshot.
///
/// Rows are processed strictly sequentially in spreadsheet traversal order;
/// the pool is read once per pass and never mutated, so rows are independent
/// of one another.
pub struct Reconciler<'a> {
    config: &'a CompiledConfig,
    classifier: RowClassifier<'a>,
    resolver: FileResolver<'a>,
}

impl<'a> Reconciler<'a> {
    pub fn new(config: &'a CompiledConfig) -> Self {
        Self {
            config,
            classifier: RowClassifier::new(config),
            resolver: FileResolver::new(config),
        }
    }

    /// Validate every non-empty header against the category table.
    ///
    /// Runs before any row is processed, so an unknown category aborts the
    /// pass before producing any output.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownCategory` naming the offending header.
    pub fn check_headers(&self, catalog: &Catalog) -> Result<(), ConfigError> {
        for category in catalog.category_names() {
            if !self.config.has_category(category) {
                return Err(ConfigError::UnknownCategory(category.to_string()));
            }
        }
        Ok(())
    }

    /// Run one reconciliation pass.
    ///
    /// Each non-empty cell is classified into candidate prefixes and
    /// resolved against the pool. Unresolved rows are collected, never
    /// fatal; the pass either completes in full or aborts on a
    /// configuration error.
    pub fn run(
        &self,
        catalog: &Catalog,
        pool: &[String],
        progress: Option<&ProgressBar>,
    ) -> Result<PassOutcome, ConfigError> {
        self.check_headers(catalog)?;

        let mut outcome = PassOutcome::default();
        for (category, raw_title) in catalog.cells() {
            let plan = self.classifier.classify(category, raw_title)?;
            if plan.is_suspicious() {
                outcome.warnings.push(format!(
                    "{}: \"{}\" normalized to an empty title",
                    category, raw_title
                ));
            }

            match self.resolver.resolve(&plan.prefixes, pool) {
                Some(file) => {
                    outcome
                        .tree
                        .insert(category, ResolvedEntry::new(&plan.title, &file));
                }
                None => {
                    outcome.unresolved.push(UnresolvedRow {
                        category: category.to_string(),
                        title: plan.title,
                        prefixes: plan.prefixes,
                    });
                }
            }

            if let Some(pb) = progress {
                pb.inc(1);
            }
        }

        Ok(outcome)
    }
}

/// Snapshot the resource pool: the filenames in `resources_dir` admitted by
/// the pool exclusion rules, sorted for deterministic traversal.
pub fn list_pool(resources_dir: &Path, config: &CompiledConfig) -> Result<Vec<String>, String> {
    let entries = fs::read_dir(resources_dir).map_err(|e| {
        format!(
            "Error reading directory {}: {}",
            resources_dir.display(),
            e
        )
    })?;

    let mut pool = Vec::new();
    for entry in entries.flatten() {
        if let Ok(file_type) = entry.file_type()
            && file_type.is_file()
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if config.admits_pool_file(&name) {
                pool.push(name);
            }
        }
    }
    pool.sort();

    Ok(pool)
}

/// Runs a reconciliation pass with the default configuration discovery.
///
/// # Examples
///
/// ```no_run
/// use shelfmatch::cli::run_cli;
/// use std::path::Path;
///
/// let result = run_cli(Path::new("downloads/resources"), Path::new("Resources.csv"));
/// match result {
///     Ok(()) => println!("Pass completed"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(resources_dir: &Path, catalog_path: &Path) -> Result<(), String> {
    run_cli_with_config(resources_dir, catalog_path, None, None)
}

/// Runs a reconciliation pass with an explicit configuration file and an
/// optional JSON report destination.
///
/// Configuration and catalog errors abort the pass with a message;
/// unresolved rows only degrade output completeness and are reported for
/// operator follow-up.
pub fn run_cli_with_config(
    resources_dir: &Path,
    catalog_path: &Path,
    config_path: Option<&Path>,
    report_path: Option<&Path>,
) -> Result<(), String> {
    OutputFormatter::info(&format!(
        "Reconciling {} against {}",
        catalog_path.display(),
        resources_dir.display()
    ));

    let config = MatchConfig::load(config_path)
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let compiled = config
        .compile()
        .map_err(|e| format!("Error compiling configuration: {}", e))?;

    let catalog = Catalog::from_path(catalog_path).map_err(|e| e.to_string())?;
    let pool = list_pool(resources_dir, &compiled)?;

    let reconciler = Reconciler::new(&compiled);
    let pb = OutputFormatter::create_progress_bar(catalog.cell_count() as u64);
    let outcome = reconciler
        .run(&catalog, &pool, Some(&pb))
        .map_err(|e| e.to_string())?;
    pb.finish_and_clear();

    for warning in &outcome.warnings {
        OutputFormatter::warning(warning);
    }
    for group in outcome.tree.groups() {
        for entry in &group.entries {
            OutputFormatter::resolved_line(&group.category, entry);
        }
    }
    for row in &outcome.unresolved {
        OutputFormatter::unresolved_line(row);
    }

    OutputFormatter::summary_table(&outcome.tree, outcome.unresolved.len());

    if let Some(path) = report_path {
        let report = ReconcileReport::new(resources_dir, &outcome);
        report.save(path).map_err(|e| e.to_string())?;
        OutputFormatter::info(&format!("Report written to {}", path.display()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::EntryKind;
    use std::fs::File;
    use tempfile::TempDir;

    fn compiled() -> CompiledConfig {
        MatchConfig::default().compile().unwrap()
    }

    fn catalog(headers: &[&str], rows: &[&[&str]]) -> Catalog {
        Catalog::from_rows(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn pool(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_pass_groups_by_category_in_row_order() {
        let config = compiled();
        let reconciler = Reconciler::new(&config);
        let catalog = catalog(
            &["Board Books", "SH Videos"],
            &[
                &["Three Little Kittens", "Wheels on the Bus"],
                &["Itsy Bitsy Spider", ""],
            ],
        );
        let pool = pool(&[
            "Board Book.Three Little Kittens.pdf",
            "Board Book.Itsy Bitsy Spider.pdf",
            "SH.ANIM.Wheels on the Bus.mp4",
        ]);

        let outcome = reconciler.run(&catalog, &pool, None).unwrap();

        let categories: Vec<_> = outcome
            .tree
            .groups()
            .iter()
            .map(|g| g.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Board Books", "SH Videos"]);

        let board_books = outcome.tree.entries("Board Books").unwrap();
        assert_eq!(board_books[0].title, "Three Little Kittens");
        assert_eq!(board_books[1].title, "Itsy Bitsy Spider");
        assert_eq!(board_books[0].kind, EntryKind::Document);

        let videos = outcome.tree.entries("SH Videos").unwrap();
        assert_eq!(videos[0].file, "SH.ANIM.Wheels on the Bus.mp4");
        assert_eq!(videos[0].kind, EntryKind::Video);
    }

    #[test]
    fn test_unresolved_row_does_not_halt_pass() {
        let config = compiled();
        let reconciler = Reconciler::new(&config);
        let catalog = catalog(
            &["Board Books"],
            &[&["Missing Title"], &["Three Little Kittens"]],
        );
        let pool = pool(&["Board Book.Three Little Kittens.pdf"]);

        let outcome = reconciler.run(&catalog, &pool, None).unwrap();

        assert_eq!(outcome.tree.entry_count(), 1);
        assert_eq!(outcome.unresolved.len(), 1);
        assert_eq!(outcome.unresolved[0].title, "Missing Title");
        assert_eq!(
            outcome.unresolved[0].prefixes,
            vec!["Board Book.Missing Title.".to_string()]
        );
    }

    #[test]
    fn test_unknown_header_aborts_before_output() {
        let config = compiled();
        let reconciler = Reconciler::new(&config);
        let catalog = catalog(
            &["Board Books", "Posters"],
            &[&["Three Little Kittens", "Alphabet"]],
        );
        let pool = pool(&["Board Book.Three Little Kittens.pdf"]);

        let result = reconciler.run(&catalog, &pool, None);
        assert!(matches!(result, Err(ConfigError::UnknownCategory(_))));
    }

    #[test]
    fn test_marker_only_title_is_flagged() {
        let config = compiled();
        let reconciler = Reconciler::new(&config);
        let catalog = catalog(&["Board Books"], &[&["(Anim)"]]);

        let outcome = reconciler.run(&catalog, &pool(&[]), None).unwrap();
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.unresolved.len(), 1);
    }

    #[test]
    fn test_list_pool_skips_directories_and_hidden_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        File::create(base.join("Board Book.Kittens.pdf")).expect("create file");
        File::create(base.join(".DS_Store")).expect("create file");
        fs::create_dir(base.join("subdir")).expect("create dir");

        let config = compiled();
        let pool = list_pool(base, &config).unwrap();
        assert_eq!(pool, vec!["Board Book.Kittens.pdf".to_string()]);
    }

    #[test]
    fn test_list_pool_missing_directory_fails() {
        let config = compiled();
        let result = list_pool(Path::new("/non/existent/path"), &config);
        assert!(result.is_err());
    }
}
