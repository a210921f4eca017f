//! Common types used throughout the rating engine

use serde::{Deserialize, Serialize};
use skillratings::trueskill::TrueSkillRating;

/// Unique identifier for players
pub type PlayerName = String;

/// Which of the two teams in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Team1,
    Team2,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Team1 => write!(f, "Team 1"),
            Side::Team2 => write!(f, "Team 2"),
        }
    }
}

/// Nominal role a player occupies on a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Defense,
    Offense,
}

/// Which of a player's three ratings is meant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingAxis {
    Overall,
    Offense,
    Defense,
}

impl std::fmt::Display for RatingAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingAxis::Overall => write!(f, "rating"),
            RatingAxis::Offense => write!(f, "off_rating"),
            RatingAxis::Defense => write!(f, "def_rating"),
        }
    }
}

/// Belief about a player's latent skill on one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingDistribution {
    pub mean: f64,
    pub uncertainty: f64,
}

impl RatingDistribution {
    pub fn new(mean: f64, uncertainty: f64) -> Self {
        Self { mean, uncertainty }
    }

    /// True when both components are finite and the uncertainty is non-negative
    pub fn is_valid(&self) -> bool {
        self.mean.is_finite() && self.uncertainty.is_finite() && self.uncertainty >= 0.0
    }
}

impl Default for RatingDistribution {
    fn default() -> Self {
        Self {
            mean: 25.0,
            uncertainty: 25.0 / 3.0,
        }
    }
}

impl From<TrueSkillRating> for RatingDistribution {
    fn from(rating: TrueSkillRating) -> Self {
        Self {
            mean: rating.rating,
            uncertainty: rating.uncertainty,
        }
    }
}

impl From<RatingDistribution> for TrueSkillRating {
    fn from(rating: RatingDistribution) -> Self {
        Self {
            rating: rating.mean,
            uncertainty: rating.uncertainty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_trueskill_prior() {
        let prior = RatingDistribution::default();
        let trueskill = TrueSkillRating::new();
        assert_eq!(prior.mean, trueskill.rating);
        assert!((prior.uncertainty - trueskill.uncertainty).abs() < 1e-12);
    }

    #[test]
    fn test_validity() {
        assert!(RatingDistribution::new(25.0, 0.0).is_valid());
        assert!(!RatingDistribution::new(25.0, -0.1).is_valid());
        assert!(!RatingDistribution::new(f64::NAN, 1.0).is_valid());
    }
}
