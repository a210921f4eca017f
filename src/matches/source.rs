//! Match row sources
//!
//! This module defines where raw match rows come from. Rows are expected to be
//! ordered oldest first; sources never reorder them.

use crate::error::{RatingError, Result};
use crate::matches::record::{Match, RowFormat};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A raw tabular row
pub type Row = Vec<String>;

/// Trait for fetching match rows from an external tabular store
pub trait MatchSource: Send + Sync {
    /// Fetch every match row, in chronological order
    fn fetch_rows(&self) -> Result<Vec<Row>>;

    /// Human-readable description for logging
    fn describe(&self) -> String;
}

/// Fetch and parse all matches from a source. Stops at the first unparseable date.
pub fn fetch_matches(source: &dyn MatchSource, format: &RowFormat) -> Result<Vec<Match>> {
    let rows = source.fetch_rows()?;
    info!("Fetched {} rows from {}", rows.len(), source.describe());

    rows.iter()
        .enumerate()
        .filter(|(_, row)| !is_blank(row))
        .map(|(i, row)| {
            Match::from_row(row, format).map_err(|e| e.context(format!("row {}", i + 1)))
        })
        .collect()
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// CSV file source
#[derive(Debug, Clone)]
pub struct CsvMatchSource {
    path: PathBuf,
    has_headers: bool,
}

impl CsvMatchSource {
    pub fn new(path: impl Into<PathBuf>, has_headers: bool) -> Self {
        Self {
            path: path.into(),
            has_headers,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MatchSource for CsvMatchSource {
    fn fetch_rows(&self) -> Result<Vec<Row>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.has_headers)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| RatingError::SourceError {
                message: format!("Failed to open {}: {}", self.path.display(), e),
            })?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| RatingError::SourceError {
                message: format!("Failed to read {}: {}", self.path.display(), e),
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!("Read {} records from {}", rows.len(), self.path.display());
        Ok(rows)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory source for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct InMemoryMatchSource {
    rows: Vec<Row>,
}

impl InMemoryMatchSource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn from_str_rows(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }
}

impl MatchSource for InMemoryMatchSource {
    fn fetch_rows(&self) -> Result<Vec<Row>> {
        Ok(self.rows.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory source ({} rows)", self.rows.len())
    }
}
