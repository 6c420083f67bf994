/// The output side of a reconciliation pass: the grouped content tree, the
/// unresolved-row list, and the JSON report persisted for operator review.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// How a resolved file is packaged downstream, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Video,
    Document,
}

impl EntryKind {
    /// Classify a filename by extension. The mapping is the single place to
    /// extend when new container formats appear in the resource drops.
    pub fn from_filename(filename: &str) -> Self {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some("mp4") => EntryKind::Video,
            _ => EntryKind::Document,
        }
    }
}

/// One catalog title bound to exactly one pool filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEntry {
    pub title: String,
    pub file: String,
    pub kind: EntryKind,
}

impl ResolvedEntry {
    pub fn new(title: &str, file: &str) -> Self {
        Self {
            title: title.to_string(),
            file: file.to_string(),
            kind: EntryKind::from_filename(file),
        }
    }
}

/// All resolved entries for one category, in spreadsheet row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: String,
    pub entries: Vec<ResolvedEntry>,
}

/// The grouped, ordered content tree. Category order follows first
/// appearance during the pass; entry order within a category follows
/// spreadsheet traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTree {
    groups: Vec<CategoryGroup>,
}

impl ContentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry under its category, creating the group on first use.
    pub fn insert(&mut self, category: &str, entry: ResolvedEntry) {
        if let Some(group) = self.groups.iter_mut().find(|g| g.category == category) {
            group.entries.push(entry);
        } else {
            self.groups.push(CategoryGroup {
                category: category.to_string(),
                entries: vec![entry],
            });
        }
    }

    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    /// The entries for one category, if any resolved.
    pub fn entries(&self, category: &str) -> Option<&[ResolvedEntry]> {
        self.groups
            .iter()
            .find(|g| g.category == category)
            .map(|g| g.entries.as_slice())
    }

    /// Total number of resolved entries across all categories.
    pub fn entry_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// A catalog title no pool filename satisfied, kept with the candidate
/// prefixes that were attempted so operators can follow up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedRow {
    pub category: String,
    pub title: String,
    pub prefixes: Vec<String>,
}

/// The complete result of one reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct PassOutcome {
    pub tree: ContentTree,
    pub unresolved: Vec<UnresolvedRow>,
    /// Operator-facing notes collected during the pass (e.g. a title that
    /// normalized to the empty string).
    pub warnings: Vec<String>,
}

/// Errors that can occur while persisting or reading a report.
#[derive(Debug)]
pub enum ReportError {
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    InvalidFormat {
        reason: String,
    },
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::WriteFailed { path, source } => {
                write!(f, "Failed to write report {}: {}", path.display(), source)
            }
            ReportError::ReadFailed { path, source } => {
                write!(f, "Failed to read report {}: {}", path.display(), source)
            }
            ReportError::InvalidFormat { reason } => {
                write!(f, "Invalid report format: {}", reason)
            }
        }
    }
}

impl std::error::Error for ReportError {}

/// JSON record of a reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// RFC 3339 timestamp of when the pass ran.
    pub timestamp: String,
    /// The resource directory the pool was listed from.
    pub resource_dir: String,
    pub groups: Vec<CategoryGroup>,
    pub unresolved: Vec<UnresolvedRow>,
}

impl ReconcileReport {
    pub fn new(resource_dir: &Path, outcome: &PassOutcome) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            resource_dir: resource_dir.to_string_lossy().to_string(),
            groups: outcome.tree.groups().to_vec(),
            unresolved: outcome.unresolved.clone(),
        }
    }

    pub fn resolved_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    /// Save this report as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| ReportError::InvalidFormat {
            reason: format!("JSON serialization failed: {}", e),
        })?;

        fs::write(path, json).map_err(|e| ReportError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load a previously saved report.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let json = fs::read_to_string(path).map_err(|e| ReportError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&json).map_err(|e| ReportError::InvalidFormat {
            reason: format!("JSON parse error: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_entry_kind_by_extension() {
        assert_eq!(EntryKind::from_filename("SH.ANIM.Wheels.mp4"), EntryKind::Video);
        assert_eq!(EntryKind::from_filename("SH.ANIM.Wheels.MP4"), EntryKind::Video);
        assert_eq!(
            EntryKind::from_filename("Board Book.Kittens.pdf"),
            EntryKind::Document
        );
        assert_eq!(EntryKind::from_filename("no-extension"), EntryKind::Document);
    }

    #[test]
    fn test_tree_preserves_category_first_appearance_order() {
        let mut tree = ContentTree::new();
        tree.insert("B", ResolvedEntry::new("one", "one.pdf"));
        tree.insert("A", ResolvedEntry::new("two", "two.pdf"));
        tree.insert("B", ResolvedEntry::new("three", "three.pdf"));

        let categories: Vec<_> = tree.groups().iter().map(|g| g.category.as_str()).collect();
        assert_eq!(categories, vec!["B", "A"]);
        assert_eq!(tree.entries("B").unwrap().len(), 2);
        assert_eq!(tree.entry_count(), 3);
    }

    #[test]
    fn test_tree_preserves_entry_insertion_order() {
        let mut tree = ContentTree::new();
        tree.insert("A", ResolvedEntry::new("first", "first.pdf"));
        tree.insert("A", ResolvedEntry::new("second", "second.pdf"));

        let titles: Vec<_> = tree
            .entries("A")
            .unwrap()
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn test_report_save_and_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let report_path = temp_dir.path().join("report.json");

        let mut outcome = PassOutcome::default();
        outcome
            .tree
            .insert("Board Books", ResolvedEntry::new("Kittens", "Board Book.Kittens.pdf"));
        outcome.unresolved.push(UnresolvedRow {
            category: "SH Videos".to_string(),
            title: "Missing".to_string(),
            prefixes: vec!["SH.ANIM.Missing.".to_string()],
        });

        let report = ReconcileReport::new(Path::new("/data/resources"), &outcome);
        report.save(&report_path).expect("Failed to save report");

        let loaded = ReconcileReport::load(&report_path).expect("Failed to load report");
        assert_eq!(loaded.resolved_count(), 1);
        assert_eq!(loaded.groups[0].entries[0].kind, EntryKind::Document);
        assert_eq!(loaded.unresolved.len(), 1);
        assert_eq!(loaded.resource_dir, "/data/resources");
    }

    #[test]
    fn test_load_missing_report_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = ReconcileReport::load(&temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(ReportError::ReadFailed { .. })));
    }

    #[test]
    fn test_load_malformed_report_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let report_path = temp_dir.path().join("report.json");
        fs::write(&report_path, "not json").expect("Failed to write file");

        let result = ReconcileReport::load(&report_path);
        assert!(matches!(result, Err(ReportError::InvalidFormat { .. })));
    }
}
