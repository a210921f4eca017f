//! Leaderboards and report output
//!
//! This module turns a finished player registry into the ratings table and
//! the two role leaderboards, and writes them to a report sink.

pub mod builder;
pub mod sink;

// Re-export commonly used types
pub use builder::{
    truncate_below, ExposedRating, LeaderboardBuilder, LeaderboardEntry, Leaderboards,
    RatingsRow, ReportTable,
};
pub use sink::{CsvReportSink, MemoryReportSink, ReportDestination, ReportSink};
