//! Rank inference interface
//!
//! The Bayesian machinery that turns prior ratings plus a match outcome into
//! posterior ratings lives behind [`RankInference`]. The orchestrator only
//! builds calls and folds the results back.

use crate::error::{RatingError, Result};
use crate::types::RatingDistribution;
use std::sync::Mutex;

/// Teams of rating distributions, in call order
pub type TeamGroups = Vec<Vec<RatingDistribution>>;

/// Trait for computing posterior ratings from a ranked team outcome
#[cfg_attr(test, mockall::automock)]
pub trait RankInference: Send + Sync {
    /// Update every distribution in `teams`
    ///
    /// # Arguments
    /// * `teams` - Ordered teams, each an ordered list of distributions
    /// * `ranks` - One value per team, lower = better, equal = draw
    /// * `weights` - One weight per distribution; 0 leaves a slot unmoved
    ///
    /// # Returns
    /// Posterior distributions in the same shape as `teams`
    fn rate(&self, teams: &[Vec<RatingDistribution>], ranks: &[u32], weights: &[Vec<f64>])
        -> Result<TeamGroups>;

    /// Prior for a player never seen before
    fn initial_rating(&self) -> RatingDistribution;

    /// Conservative single-number skill estimate, for ranking and display only
    fn expose(&self, rating: &RatingDistribution) -> f64;
}

/// Check that `weights` lines up with `teams` and `ranks`
pub fn check_call_shape(
    teams: &[Vec<RatingDistribution>],
    ranks: &[u32],
    weights: &[Vec<f64>],
) -> Result<()> {
    if teams.len() != ranks.len() || teams.len() != weights.len() {
        return Err(RatingError::ContractViolation {
            reason: format!(
                "{} teams, {} ranks, {} weight groups",
                teams.len(),
                ranks.len(),
                weights.len()
            ),
        }
        .into());
    }
    for (i, (team, team_weights)) in teams.iter().zip(weights).enumerate() {
        if team.len() != team_weights.len() {
            return Err(RatingError::ContractViolation {
                reason: format!(
                    "team {} has {} ratings but {} weights",
                    i,
                    team.len(),
                    team_weights.len()
                ),
            }
            .into());
        }
    }
    Ok(())
}

/// One recorded call to a [`RecordingRankInference`]
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceCall {
    pub teams: TeamGroups,
    pub ranks: Vec<u32>,
    pub weights: Vec<Vec<f64>>,
}

/// Deterministic stand-in that records every call
///
/// Each slot's mean moves by `step × weight`, up for rank-1 teams and down for
/// the rest; uncertainty is left alone. A step of 0 returns the inputs.
#[derive(Debug, Default)]
pub struct RecordingRankInference {
    calls: Mutex<Vec<InferenceCall>>,
    step: f64,
}

impl RecordingRankInference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(step: f64) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            step,
        }
    }

    /// Get all calls made (for testing)
    pub fn calls(&self) -> Vec<InferenceCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Clear recorded calls
    pub fn clear_calls(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }
}

impl RankInference for RecordingRankInference {
    fn rate(
        &self,
        teams: &[Vec<RatingDistribution>],
        ranks: &[u32],
        weights: &[Vec<f64>],
    ) -> Result<TeamGroups> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(InferenceCall {
                teams: teams.to_vec(),
                ranks: ranks.to_vec(),
                weights: weights.to_vec(),
            });
        }

        check_call_shape(teams, ranks, weights)?;
        let best = ranks.iter().copied().min().unwrap_or(0);

        Ok(teams
            .iter()
            .zip(ranks)
            .zip(weights)
            .map(|((team, &rank), team_weights)| {
                let direction = if rank == best { 1.0 } else { -1.0 };
                team.iter()
                    .zip(team_weights)
                    .map(|(rating, weight)| {
                        RatingDistribution::new(
                            rating.mean + direction * self.step * weight,
                            rating.uncertainty,
                        )
                    })
                    .collect()
            })
            .collect())
    }

    fn initial_rating(&self) -> RatingDistribution {
        RatingDistribution::default()
    }

    fn expose(&self, rating: &RatingDistribution) -> f64 {
        rating.mean - 3.0 * rating.uncertainty
    }
}
