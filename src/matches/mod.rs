//! Match records and the sources they are read from

pub mod record;
pub mod source;

// Re-export commonly used types
pub use record::{parse_score, Match, RowFormat, TeamResult};
pub use source::{fetch_matches, CsvMatchSource, InMemoryMatchSource, MatchSource, Row};
