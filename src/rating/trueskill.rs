//! TrueSkill rank inference
//!
//! This module provides the production implementation of [`RankInference`]
//! using the TrueSkill algorithm from the skillratings crate.
//!
//! skillratings has no notion of partial play, so per-slot weights are folded
//! into the team sum: a slot with weight `w` enters the update as the skill
//! `w·s`, i.e. `(w·μ, w·σ)`, and its posterior is divided by `w` on the way
//! out. Slots with a non-positive weight sit the update out unchanged.

use crate::config::RatingConfig;
use crate::error::{RatingError, Result};
use crate::rating::inference::{check_call_shape, RankInference, TeamGroups};
use crate::types::RatingDistribution;
use serde::{Deserialize, Serialize};
use skillratings::trueskill::{trueskill_multi_team, TrueSkillConfig, TrueSkillRating};
use skillratings::MultiTeamOutcome;
use tracing::warn;

/// Uncertainty never drops below this after an update
const MIN_UNCERTAINTY: f64 = 1e-6;

/// Extended configuration for the TrueSkill rating system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendedTrueSkillConfig {
    /// Core TrueSkill parameters
    pub trueskill_config: TrueSkillConfig,
    /// Initial rating for new players
    pub initial_rating: f64,
    /// Initial uncertainty for new players
    pub initial_uncertainty: f64,
    /// Standard deviations subtracted by [`RankInference::expose`]
    pub exposure_factor: f64,
}

impl Default for ExtendedTrueSkillConfig {
    fn default() -> Self {
        Self::from(&RatingConfig::default())
    }
}

impl From<&RatingConfig> for ExtendedTrueSkillConfig {
    fn from(config: &RatingConfig) -> Self {
        Self {
            trueskill_config: TrueSkillConfig {
                draw_probability: config.draw_probability,
                beta: config.beta,
                default_dynamics: config.default_dynamics,
            },
            initial_rating: config.initial_rating,
            initial_uncertainty: config.initial_uncertainty,
            exposure_factor: config.exposure_factor,
        }
    }
}

impl ExtendedTrueSkillConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.trueskill_config.beta <= 0.0 {
            return Err(RatingError::ConfigurationError {
                message: "Beta must be positive".to_string(),
            }
            .into());
        }

        if !(0.0..1.0).contains(&self.trueskill_config.draw_probability) {
            return Err(RatingError::ConfigurationError {
                message: "Draw probability must be in [0, 1)".to_string(),
            }
            .into());
        }

        if self.initial_uncertainty <= 0.0 {
            return Err(RatingError::ConfigurationError {
                message: "Initial uncertainty must be positive".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// TrueSkill rank inference
#[derive(Debug)]
pub struct TrueSkillInference {
    config: ExtendedTrueSkillConfig,
}

impl TrueSkillInference {
    /// Create a new TrueSkill inference
    pub fn new(config: ExtendedTrueSkillConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }
}

impl RankInference for TrueSkillInference {
    fn rate(
        &self,
        teams: &[Vec<RatingDistribution>],
        ranks: &[u32],
        weights: &[Vec<f64>],
    ) -> Result<TeamGroups> {
        check_call_shape(teams, ranks, weights)?;

        let unchanged = teams.to_vec();

        if teams.len() < 2 {
            return Ok(unchanged);
        }

        let all_tied = ranks.windows(2).all(|pair| pair[0] == pair[1]);
        if all_tied && self.config.trueskill_config.draw_probability <= 0.0 {
            // A draw is impossible under this environment and carries no information
            warn!("Tied ranks with zero draw probability, ratings left unchanged");
            return Ok(unchanged);
        }

        let plan = participation(teams, weights);
        if plan.iter().all(|team| !team.updated) {
            warn!("No team has weighted players, ratings left unchanged");
            return Ok(unchanged);
        }
        if plan.iter().any(|team| team.slots.is_empty()) {
            warn!("An empty team cannot be rated, ratings left unchanged");
            return Ok(unchanged);
        }

        let scaled: Vec<Vec<TrueSkillRating>> = plan
            .iter()
            .zip(teams)
            .map(|(team_plan, team)| {
                team_plan
                    .slots
                    .iter()
                    .map(|&(slot, weight)| TrueSkillRating::from(scale(team[slot], weight)))
                    .collect()
            })
            .collect();
        let teams_and_ranks: Vec<(&[TrueSkillRating], MultiTeamOutcome)> = scaled
            .iter()
            .zip(ranks)
            .map(|(team, &rank)| (team.as_slice(), MultiTeamOutcome::new(rank as usize)))
            .collect();

        let posterior = trueskill_multi_team(&teams_and_ranks, &self.config.trueskill_config);

        if posterior.len() != teams.len() {
            return Err(RatingError::RatingCalculationFailed {
                reason: format!(
                    "expected {} teams back, got {}",
                    teams.len(),
                    posterior.len()
                ),
            }
            .into());
        }

        let mut result = unchanged;
        for (team_index, (team_plan, team_posterior)) in plan.iter().zip(&posterior).enumerate() {
            if team_plan.slots.len() != team_posterior.len() {
                return Err(RatingError::RatingCalculationFailed {
                    reason: format!("team {} came back with the wrong size", team_index),
                }
                .into());
            }
            if !team_plan.updated {
                continue;
            }

            for (&(slot, weight), updated) in team_plan.slots.iter().zip(team_posterior) {
                let rating = unscale(RatingDistribution::from(*updated), weight);
                if !rating.is_valid() {
                    return Err(RatingError::RatingCalculationFailed {
                        reason: format!(
                            "non-finite rating for team {} slot {}",
                            team_index, slot
                        ),
                    }
                    .into());
                }
                result[team_index][slot] = rating;
            }
        }

        Ok(result)
    }

    fn initial_rating(&self) -> RatingDistribution {
        RatingDistribution::new(self.config.initial_rating, self.config.initial_uncertainty)
    }

    fn expose(&self, rating: &RatingDistribution) -> f64 {
        rating.mean - self.config.exposure_factor * rating.uncertainty
    }
}

/// Slots one team enters the update with, and whether it takes the result
struct TeamPlan {
    slots: Vec<(usize, f64)>,
    updated: bool,
}

/// Positive-weight slots play at their weight. A team without any plays at
/// full strength as a fixed opponent and keeps its priors.
fn participation(teams: &[Vec<RatingDistribution>], weights: &[Vec<f64>]) -> Vec<TeamPlan> {
    teams
        .iter()
        .zip(weights)
        .map(|(team, team_weights)| {
            let slots: Vec<(usize, f64)> = team_weights
                .iter()
                .copied()
                .enumerate()
                .filter(|&(_, weight)| weight > 0.0)
                .collect();
            if slots.is_empty() {
                TeamPlan {
                    slots: (0..team.len()).map(|slot| (slot, 1.0)).collect(),
                    updated: false,
                }
            } else {
                TeamPlan {
                    slots,
                    updated: true,
                }
            }
        })
        .collect()
}

/// Skill of a player contributing `weight` of their performance to the team
fn scale(rating: RatingDistribution, weight: f64) -> RatingDistribution {
    RatingDistribution::new(weight * rating.mean, weight * rating.uncertainty)
}

/// Back from the weighted skill to the player's own
fn unscale(rating: RatingDistribution, weight: f64) -> RatingDistribution {
    RatingDistribution::new(
        rating.mean / weight,
        (rating.uncertainty / weight).max(MIN_UNCERTAINTY),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inference() -> TrueSkillInference {
        TrueSkillInference::new(ExtendedTrueSkillConfig::default()).unwrap()
    }

    fn fresh(n: usize) -> Vec<RatingDistribution> {
        vec![RatingDistribution::default(); n]
    }

    #[test]
    fn test_config_validation() {
        let mut config = ExtendedTrueSkillConfig::default();
        assert!(config.validate().is_ok());

        config.trueskill_config.beta = -1.0;
        assert!(config.validate().is_err());

        config = ExtendedTrueSkillConfig::default();
        config.initial_uncertainty = 0.0;
        assert!(config.validate().is_err());

        config = ExtendedTrueSkillConfig::default();
        config.trueskill_config.draw_probability = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_lower_rank_wins() {
        let inference = inference();
        let result = inference
            .rate(&[fresh(2), fresh(2)], &[1, 2], &[vec![1.0; 2], vec![1.0; 2]])
            .unwrap();

        let prior = RatingDistribution::default();
        for rating in &result[0] {
            assert!(rating.mean > prior.mean);
            assert!(rating.uncertainty < prior.uncertainty);
        }
        for rating in &result[1] {
            assert!(rating.mean < prior.mean);
        }
    }

    #[test]
    fn test_zero_weight_slot_is_unmoved() {
        let inference = inference();
        let result = inference
            .rate(
                &[fresh(4), fresh(4)],
                &[2, 1],
                &[vec![1.0, 0.0, 0.0, 1.0], vec![1.0, 0.0, 0.0, 1.0]],
            )
            .unwrap();

        let prior = RatingDistribution::default();
        for team in &result {
            assert_eq!(team[1], prior);
            assert_eq!(team[2], prior);
            assert_ne!(team[0], prior);
            assert_ne!(team[3], prior);
        }
        assert!(result[1][0].mean > prior.mean);
        assert!(result[0][0].mean < prior.mean);
    }

    #[test]
    fn test_heavier_losing_side_is_an_upset() {
        let inference = inference();
        let teams = [fresh(2), fresh(2)];
        let plain = inference
            .rate(&teams, &[1, 2], &[vec![1.0; 2], vec![1.0; 2]])
            .unwrap();
        let amplified = inference
            .rate(&teams, &[1, 2], &[vec![1.0; 2], vec![3.0; 2]])
            .unwrap();

        // Weight 3 makes team 2 the favourite, so losing costs more and winning pays more
        assert!(amplified[1][0].mean < plain[1][0].mean);
        assert!(amplified[0][0].mean > plain[0][0].mean);
        assert!(amplified[1][0].uncertainty >= MIN_UNCERTAINTY);
    }

    #[test]
    fn test_switched_side_plays_at_half_capacity() {
        let inference = inference();
        let teams = [fresh(4), fresh(4)];
        let weights = [vec![0.5; 4], vec![1.0, 0.0, 0.0, 1.0]];
        let prior = RatingDistribution::default().mean;

        let won = inference.rate(&teams, &[1, 2], &weights).unwrap();
        let lost = inference.rate(&teams, &[2, 1], &weights).unwrap();

        let switched_gain = won[0][0].mean - prior;
        let switched_loss = lost[0][0].mean - prior;
        let opponent_loss = won[1][0].mean - prior;
        let opponent_gain = lost[1][0].mean - prior;

        assert!(switched_gain > 1.0);
        assert!((switched_gain + switched_loss).abs() < 1e-4);
        assert!((opponent_gain + opponent_loss).abs() < 1e-4);

        // Four half slots carry the strength of two full players
        assert!((switched_gain / opponent_gain - 0.5).abs() < 0.01);
        for slot in 0..4 {
            assert!((won[0][slot].mean - won[0][0].mean).abs() < 1e-9);
        }
        assert_eq!(won[1][1], RatingDistribution::default());
    }

    #[test]
    fn test_team_without_weight_is_a_fixed_opponent() {
        let inference = inference();
        let teams = vec![fresh(2), fresh(2)];

        let result = inference
            .rate(&teams, &[1, 2], &[vec![1.0; 2], vec![0.0; 2]])
            .unwrap();
        assert!(result[0][0].mean > RatingDistribution::default().mean);
        assert_eq!(result[1], teams[1]);

        let result = inference
            .rate(&teams, &[1, 2], &[vec![0.0; 2], vec![-1.0; 2]])
            .unwrap();
        assert_eq!(result, teams);
    }

    #[test]
    fn test_tie_without_draw_probability_is_noop() {
        let inference = inference();
        let teams = vec![fresh(2), fresh(2)];
        let result = inference
            .rate(&teams, &[1, 1], &[vec![1.0; 2], vec![1.0; 2]])
            .unwrap();
        assert_eq!(result, teams);
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let inference = inference();
        let err = inference
            .rate(&[fresh(2), fresh(2)], &[1, 2], &[vec![1.0; 2]])
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::ContractViolation { .. })
        ));
    }

    #[test]
    fn test_expose_is_conservative() {
        let inference = inference();
        let prior = inference.initial_rating();
        assert!(inference.expose(&prior).abs() < 1e-9);
        assert_eq!(inference.expose(&RatingDistribution::new(30.0, 1.0)), 27.0);
    }
}
