//! Error types for the rating engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating-run scenarios
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("Invalid match date '{value}' (expected format {format})")]
    InvalidDate { value: String, format: String },

    #[error("Malformed match row: {reason}")]
    MalformedRow { reason: String },

    #[error("Player '{name}' appears more than once in the same match")]
    DuplicatePlayer { name: String },

    #[error("Player not registered: {name}")]
    PlayerNotFound { name: String },

    #[error("Rank inference contract violation: {reason}")]
    ContractViolation { reason: String },

    #[error("Rating calculation failed: {reason}")]
    RatingCalculationFailed { reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Match source error: {message}")]
    SourceError { message: String },

    #[error("Report sink error: {message}")]
    SinkError { message: String },
}
