//! Rating system configuration

use crate::rating::k_factor::KStrategy;
use serde::{Deserialize, Serialize};

/// TrueSkill environment and weighting policy for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// K-factor strategy applied to every match of the run
    pub strategy: KStrategy,
    /// Prior mean for new players
    pub initial_rating: f64,
    /// Prior uncertainty for new players
    pub initial_uncertainty: f64,
    /// Skill-class width
    pub beta: f64,
    /// Additive dynamics factor (tau)
    pub default_dynamics: f64,
    /// Probability of a drawn match
    pub draw_probability: f64,
    /// Number of standard deviations subtracted when exposing a rating
    pub exposure_factor: f64,
    /// Changes smaller than this in both mean and uncertainty are not reported
    pub change_tolerance: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            strategy: KStrategy::ShutoutDoubleGame,
            initial_rating: 25.0,
            initial_uncertainty: 25.0 / 3.0,
            beta: 25.0 / 6.0,
            default_dynamics: 25.0 / 300.0,
            draw_probability: 0.0,
            exposure_factor: 3.0,
            change_tolerance: 0.01,
        }
    }
}
