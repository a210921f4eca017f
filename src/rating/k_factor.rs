//! K-factor strategies
//!
//! A strategy decides how much more the non-winning team's ratings move
//! for a given match, either through a multiplier or by repeating the match.

use crate::error::RatingError;
use crate::matches::Match;
use serde::{Deserialize, Serialize};

/// Weighting policy, fixed for a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KStrategy {
    /// k = 1 for every match
    Constant,
    /// k shrinks as the losing team scores more, down to [`MIN_MARGIN_K`]; a shutout gets k = 3
    ByMargin,
    /// k = 1, but shutouts are rated twice
    ShutoutDoubleGame,
}

impl KStrategy {
    /// Multiplier applied to the non-winning team
    pub fn k_factor(self, losing_score: u32) -> f64 {
        match self {
            KStrategy::Constant => 1.0,
            KStrategy::ByMargin => by_margin(losing_score),
            KStrategy::ShutoutDoubleGame => 1.0,
        }
    }

    /// How many times `game` is rated in a row
    pub fn repetitions(self, game: &Match) -> usize {
        match self {
            KStrategy::Constant | KStrategy::ByMargin => 1,
            KStrategy::ShutoutDoubleGame => {
                if game.is_shutout() {
                    2
                } else {
                    1
                }
            }
        }
    }

    /// Materialize the sequence of matches to rate, preserving order
    pub fn expand(self, matches: &[Match]) -> Vec<Match> {
        matches
            .iter()
            .flat_map(|game| std::iter::repeat(game).take(self.repetitions(game)))
            .cloned()
            .collect()
    }
}

/// Smallest by-margin multiplier; the losing side always takes part
pub const MIN_MARGIN_K: f64 = 0.1;

fn by_margin(losing_score: u32) -> f64 {
    if losing_score == 0 {
        3.0
    } else {
        (2.0 - 0.1 * f64::from(losing_score + 1)).max(MIN_MARGIN_K)
    }
}

impl Default for KStrategy {
    fn default() -> Self {
        KStrategy::ShutoutDoubleGame
    }
}

impl std::fmt::Display for KStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KStrategy::Constant => write!(f, "constant"),
            KStrategy::ByMargin => write!(f, "by-margin"),
            KStrategy::ShutoutDoubleGame => write!(f, "shutout-double-game"),
        }
    }
}

impl std::str::FromStr for KStrategy {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "constant" => Ok(KStrategy::Constant),
            "by-margin" | "by-score" => Ok(KStrategy::ByMargin),
            "shutout-double-game" | "shutout" => Ok(KStrategy::ShutoutDoubleGame),
            other => Err(RatingError::ConfigurationError {
                message: format!("Unknown K-factor strategy: {}", other),
            }),
        }
    }
}
