//! shelfmatch - catalog/filesystem reconciliation for curated content drops
//!
//! This library reconciles a human-curated content catalog (a spreadsheet
//! exported as CSV) against a directory of inconsistently-named downloaded
//! files. Each titled entry is classified into candidate filename prefixes,
//! resolved against the directory snapshot, and grouped into an ordered
//! content tree by category, with unresolved rows reported for operator
//! follow-up.

pub mod catalog;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod output;
pub mod resolver;
pub mod tree;

pub use catalog::{Catalog, CatalogError};
pub use classifier::{RowClassifier, RowPlan};
pub use config::{CompiledConfig, ConfigError, MatchConfig};
pub use resolver::FileResolver;
pub use tree::{
    CategoryGroup, ContentTree, EntryKind, PassOutcome, ReconcileReport, ReportError,
    ResolvedEntry, UnresolvedRow,
};

pub use cli::{Reconciler, list_pool, run_cli, run_cli_with_config};
