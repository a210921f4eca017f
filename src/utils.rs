//! Utility functions for the rating engine

use crate::types::RatingDistribution;
use chrono::{DateTime, Local};

/// Get the current local timestamp
pub fn current_timestamp() -> DateTime<Local> {
    Local::now()
}

/// Stamp used in report headers, e.g. `14:05 03/02/2024`
pub fn report_timestamp(at: &DateTime<Local>) -> String {
    at.format("%H:%M %d/%m/%Y").to_string()
}

/// Check if two values are within the given absolute tolerance
pub fn within_tolerance(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// Signed deltas between two ratings, two decimals each
pub fn format_rating_change(
    previous: &RatingDistribution,
    updated: &RatingDistribution,
    expose: impl Fn(&RatingDistribution) -> f64,
) -> String {
    format!(
        "Δμ={:+.2}, Δσ={:+.2}, ΔTS={:+.2}",
        updated.mean - previous.mean,
        updated.uncertainty - previous.uncertainty,
        expose(updated) - expose(previous)
    )
}
