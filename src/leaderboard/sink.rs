//! Report sinks
//!
//! This module defines where finished reports are written, with a CSV
//! directory implementation and an in-memory one for tests.

use crate::error::{RatingError, Result};
use crate::leaderboard::builder::ReportTable;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;

/// Which report a table is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportDestination {
    Ratings,
    OffensiveLeaderboard,
    DefensiveLeaderboard,
}

impl ReportDestination {
    pub fn file_name(&self) -> &'static str {
        match self {
            ReportDestination::Ratings => "ratings.csv",
            ReportDestination::OffensiveLeaderboard => "offensive_leaderboard.csv",
            ReportDestination::DefensiveLeaderboard => "defensive_leaderboard.csv",
        }
    }
}

impl std::fmt::Display for ReportDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportDestination::Ratings => write!(f, "Ratings"),
            ReportDestination::OffensiveLeaderboard => write!(f, "Offensive leaderboard"),
            ReportDestination::DefensiveLeaderboard => write!(f, "Defensive leaderboard"),
        }
    }
}

/// Trait for writing finished reports
pub trait ReportSink: Send + Sync {
    /// Replace the contents of `destination` with `table`
    fn write_report(&self, table: &ReportTable, destination: ReportDestination) -> Result<()>;
}

/// Writes each report to its own CSV file in a directory
#[derive(Debug, Clone)]
pub struct CsvReportSink {
    directory: PathBuf,
}

impl CsvReportSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn path_for(&self, destination: ReportDestination) -> PathBuf {
        self.directory.join(destination.file_name())
    }
}

impl ReportSink for CsvReportSink {
    fn write_report(&self, table: &ReportTable, destination: ReportDestination) -> Result<()> {
        std::fs::create_dir_all(&self.directory).map_err(|e| RatingError::SinkError {
            message: format!("Failed to create {}: {}", self.directory.display(), e),
        })?;

        let path = self.path_for(destination);
        let sink_error = |e: &dyn std::fmt::Display| RatingError::SinkError {
            message: format!("Failed to write {}: {}", path.display(), e),
        };

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&path)
            .map_err(|e| sink_error(&e))?;
        for row in table.all_rows() {
            writer.write_record(row).map_err(|e| sink_error(&e))?;
        }
        writer.flush().map_err(|e| sink_error(&e))?;

        info!(
            "Updated {} rows in {}",
            table.rows.len() + 1,
            path.display()
        );
        Ok(())
    }
}

/// Captures written reports for testing
#[derive(Debug, Default)]
pub struct MemoryReportSink {
    reports: Mutex<Vec<(ReportDestination, ReportTable)>>,
}

impl MemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all written reports, in write order
    pub fn reports(&self) -> Vec<(ReportDestination, ReportTable)> {
        self.reports
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }

    /// Most recent table written to `destination`
    pub fn latest(&self, destination: ReportDestination) -> Option<ReportTable> {
        self.reports()
            .into_iter()
            .rev()
            .find(|(d, _)| *d == destination)
            .map(|(_, table)| table)
    }
}

impl ReportSink for MemoryReportSink {
    fn write_report(&self, table: &ReportTable, destination: ReportDestination) -> Result<()> {
        let mut reports = self.reports.lock().map_err(|_| RatingError::SinkError {
            message: "Failed to acquire reports lock".to_string(),
        })?;
        reports.push((destination, table.clone()));
        Ok(())
    }
}
