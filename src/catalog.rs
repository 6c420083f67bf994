//! Catalog ingestion: the curated content spreadsheet, consumed as CSV.
//!
//! The first record is the header row; each header cell names the category
//! for its column (empty headers mark unused columns). Every later record is
//! a data row whose non-empty cells are titles. Cells are trimmed on load.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Errors that can occur while reading the catalog.
#[derive(Debug)]
pub enum CatalogError {
    /// The catalog file could not be opened.
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The catalog file is not well-formed CSV.
    ParseFailed { path: PathBuf, reason: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::ReadFailed { path, source } => {
                write!(f, "Failed to read catalog {}: {}", path.display(), source)
            }
            CatalogError::ParseFailed { path, reason } => {
                write!(f, "Malformed catalog {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// An in-memory snapshot of the catalog spreadsheet.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Catalog {
    /// Build a catalog directly from header and row data.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Load a catalog from a CSV file.
    ///
    /// Rows shorter than the header are tolerated; the missing cells read as
    /// empty. An empty file yields an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ReadFailed` if the file cannot be opened and
    /// `CatalogError::ParseFailed` on malformed CSV.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path).map_err(|e| CatalogError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut headers: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<String>> = Vec::new();

        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| CatalogError::ParseFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            let cells: Vec<String> = record.iter().map(|cell| cell.trim().to_string()).collect();
            if index == 0 {
                headers = cells;
            } else {
                rows.push(cells);
            }
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// The distinct non-empty header names, in column order.
    pub fn category_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for header in &self.headers {
            if !header.is_empty() && !names.contains(&header.as_str()) {
                names.push(header);
            }
        }
        names
    }

    /// Iterate the non-empty body cells as (category, title) pairs in
    /// traversal order: row-major outer loop, column order within a row.
    /// Cells under an empty header are skipped.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rows.iter().flat_map(move |row| {
            self.headers.iter().enumerate().filter_map(move |(column, header)| {
                if header.is_empty() {
                    return None;
                }
                let cell = row.get(column).map(String::as_str).unwrap_or("");
                if cell.is_empty() {
                    None
                } else {
                    Some((header.as_str(), cell))
                }
            })
        })
    }

    /// Number of non-empty body cells.
    pub fn cell_count(&self) -> usize {
        self.cells().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_catalog(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("catalog.csv");
        let mut file = File::create(&path).expect("Failed to create catalog");
        file.write_all(content.as_bytes())
            .expect("Failed to write catalog");
        path
    }

    #[test]
    fn test_load_headers_and_rows() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = write_catalog(
            &dir,
            "Board Books,SH Videos\nThree Little Kittens,Wheels on the Bus\n",
        );

        let catalog = Catalog::from_path(&path).unwrap();
        assert_eq!(catalog.headers(), &["Board Books", "SH Videos"]);
        assert_eq!(catalog.rows().len(), 1);
    }

    #[test]
    fn test_cells_are_row_major_then_column_order() {
        let catalog = Catalog::from_rows(
            vec!["A".to_string(), "B".to_string()],
            vec![
                vec!["a1".to_string(), "b1".to_string()],
                vec!["a2".to_string(), "b2".to_string()],
            ],
        );
        let cells: Vec<_> = catalog.cells().collect();
        assert_eq!(
            cells,
            vec![("A", "a1"), ("B", "b1"), ("A", "a2"), ("B", "b2")]
        );
    }

    #[test]
    fn test_empty_headers_and_cells_skipped() {
        let catalog = Catalog::from_rows(
            vec!["A".to_string(), String::new(), "B".to_string()],
            vec![
                vec!["a1".to_string(), "ignored".to_string(), String::new()],
                vec![String::new(), String::new(), "b2".to_string()],
            ],
        );
        let cells: Vec<_> = catalog.cells().collect();
        assert_eq!(cells, vec![("A", "a1"), ("B", "b2")]);
    }

    #[test]
    fn test_cells_are_trimmed_on_load() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = write_catalog(&dir, "Board Books\n  Three Little Kittens  \n");

        let catalog = Catalog::from_path(&path).unwrap();
        let cells: Vec<_> = catalog.cells().collect();
        assert_eq!(cells, vec![("Board Books", "Three Little Kittens")]);
    }

    #[test]
    fn test_short_rows_tolerated() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = write_catalog(&dir, "A,B\nonly-a\n");

        let catalog = Catalog::from_path(&path).unwrap();
        let cells: Vec<_> = catalog.cells().collect();
        assert_eq!(cells, vec![("A", "only-a")]);
    }

    #[test]
    fn test_category_names_deduplicated_in_order() {
        let catalog = Catalog::from_rows(
            vec![
                "B".to_string(),
                "A".to_string(),
                String::new(),
                "B".to_string(),
            ],
            vec![],
        );
        assert_eq!(catalog.category_names(), vec!["B", "A"]);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let result = Catalog::from_path(&dir.path().join("missing.csv"));
        assert!(matches!(result, Err(CatalogError::ReadFailed { .. })));
    }

    #[test]
    fn test_empty_file_is_empty_catalog() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = write_catalog(&dir, "");

        let catalog = Catalog::from_path(&path).unwrap();
        assert!(catalog.headers().is_empty());
        assert_eq!(catalog.cell_count(), 0);
    }
}
