//! Foosball Ratings - TrueSkill ratings for 2v2 table football
//!
//! This crate rates players from a chronological log of matches, keeping an
//! overall, an offensive and a defensive rating per player, and derives the
//! ratings table and role leaderboards from them.

pub mod config;
pub mod error;
pub mod leaderboard;
pub mod matches;
pub mod rating;
pub mod service;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use leaderboard::{LeaderboardBuilder, ReportSink};
pub use matches::{Match, MatchSource, TeamResult};
pub use rating::{KStrategy, PlayerRegistry, RankInference, RatingOrchestrator};
pub use service::RatingPipeline;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
