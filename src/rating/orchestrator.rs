//! Rating update orchestration
//!
//! For every match, in the order given, the orchestrator runs two independent
//! rank-inference calls against the current registry state:
//!
//! 1. an overall update with each side as a team of two overall ratings, and
//! 2. a role update with each side as a team of four `(player, role)` ratings,
//!    weighted so that only the role each player actually played moves, or,
//!    when a side switched roles mid-match, all four at half weight.
//!
//! The non-winning side's weights are scaled by the strategy's K-factor.

use crate::error::{RatingError, Result};
use crate::matches::{Match, TeamResult};
use crate::rating::inference::{RankInference, TeamGroups};
use crate::rating::k_factor::KStrategy;
use crate::rating::registry::{apply_update, ChangeSummary, PlayerRegistry};
use crate::types::{RatingAxis, RatingDistribution, Side};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Totals for one orchestrator run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Matches handed to the run
    pub matches_received: usize,
    /// Matches rated, after shutout expansion
    pub matches_processed: usize,
    /// Rating replacements that moved by more than the change tolerance
    pub significant_changes: Vec<ChangeSummary>,
    /// Matches whose winner was predicted from the ratings before the update
    pub predictions_made: usize,
    /// Of those, how many were right
    pub predictions_correct: usize,
}

impl RunSummary {
    pub fn prediction_accuracy(&self) -> Option<f64> {
        if self.predictions_made == 0 {
            None
        } else {
            Some(self.predictions_correct as f64 / self.predictions_made as f64)
        }
    }
}

/// Rank per side; lower is better and a draw ranks both sides first
pub fn team_ranks(team1_score: u32, team2_score: u32) -> [u32; 2] {
    match team1_score.cmp(&team2_score) {
        std::cmp::Ordering::Greater => [1, 2],
        std::cmp::Ordering::Less => [2, 1],
        std::cmp::Ordering::Equal => [1, 1],
    }
}

/// `(k_team1, k_team2)`: a side holding the winning score gets 1, the other gets `k`
pub fn team_multipliers(team1_score: u32, team2_score: u32, k: f64) -> (f64, f64) {
    let winning_score = team1_score.max(team2_score);
    let k_team1 = if team1_score == winning_score { 1.0 } else { k };
    let k_team2 = if team2_score == winning_score { 1.0 } else { k };
    (k_team1, k_team2)
}

/// Weights for `[def.defense, def.offense, off.defense, off.offense]`
pub fn role_weights(switched: bool, k_side: f64) -> [f64; 4] {
    if switched {
        [k_side / 2.0; 4]
    } else {
        [k_side, 0.0, 0.0, k_side]
    }
}

/// Side with the higher summed exposed overall rating; ties go to team 2
pub fn predict_winner(
    game: &Match,
    registry: &PlayerRegistry,
    inference: &dyn RankInference,
) -> Result<Side> {
    let strength = |team: &TeamResult| -> Result<f64> {
        let defense = registry.require(&team.defense)?.rating(RatingAxis::Overall);
        let offense = registry.require(&team.offense)?.rating(RatingAxis::Overall);
        Ok(inference.expose(&defense) + inference.expose(&offense))
    };

    if strength(&game.team1)? > strength(&game.team2)? {
        Ok(Side::Team1)
    } else {
        Ok(Side::Team2)
    }
}

/// Drives rating updates over an ordered batch of matches
pub struct RatingOrchestrator {
    inference: Arc<dyn RankInference>,
    strategy: KStrategy,
    change_tolerance: f64,
}

impl RatingOrchestrator {
    pub fn new(inference: Arc<dyn RankInference>, strategy: KStrategy) -> Self {
        Self {
            inference,
            strategy,
            change_tolerance: 0.01,
        }
    }

    pub fn with_change_tolerance(mut self, tolerance: f64) -> Self {
        self.change_tolerance = tolerance;
        self
    }

    /// Build a registry for `matches` and rate them
    pub fn rate_all(&self, matches: &[Match]) -> Result<(PlayerRegistry, RunSummary)> {
        let mut registry = PlayerRegistry::build(matches, self.inference.initial_rating());
        let summary = self.run(&mut registry, matches)?;
        Ok((registry, summary))
    }

    /// Rate `matches` in order against `registry`. Every player must be registered.
    pub fn run(&self, registry: &mut PlayerRegistry, matches: &[Match]) -> Result<RunSummary> {
        let expanded = self.strategy.expand(matches);

        let mut summary = RunSummary {
            matches_received: matches.len(),
            ..RunSummary::default()
        };

        for game in &expanded {
            self.process_match(registry, game, &mut summary)?;
            summary.matches_processed += 1;
        }

        info!(
            "Rated {} matches ({} after {} expansion), {} significant changes",
            summary.matches_received,
            summary.matches_processed,
            self.strategy,
            summary.significant_changes.len()
        );
        if let Some(accuracy) = summary.prediction_accuracy() {
            info!(
                "Predicted {}/{} winners ({:.1}%)",
                summary.predictions_correct,
                summary.predictions_made,
                accuracy * 100.0
            );
        }

        Ok(summary)
    }

    fn process_match(
        &self,
        registry: &mut PlayerRegistry,
        game: &Match,
        summary: &mut RunSummary,
    ) -> Result<()> {
        debug!("========== {} ==========", game.date);

        for name in game.player_names() {
            if !registry.contains(name) {
                return Err(RatingError::PlayerNotFound {
                    name: name.to_string(),
                }
                .into());
            }
        }

        if let Some(winner) = game.winner() {
            let predicted = predict_winner(game, registry, self.inference.as_ref())?;
            summary.predictions_made += 1;
            if predicted == winner {
                summary.predictions_correct += 1;
            }
        }

        for name in game.player_names() {
            registry.require_mut(name)?.games.push(game.clone());
        }

        let (team1, team2) = (&game.team1, &game.team2);
        let (losing_score, _) = game.score_bounds();
        let k = self.strategy.k_factor(losing_score);
        let (k_team1, k_team2) = team_multipliers(team1.score, team2.score, k);
        let ranks = team_ranks(team1.score, team2.score);

        // Overall: [defense, offense] per side
        let overall_teams = vec![
            self.current(registry, team1, &[RatingAxis::Overall])?,
            self.current(registry, team2, &[RatingAxis::Overall])?,
        ];
        let overall_weights = vec![vec![k_team1; 2], vec![k_team2; 2]];
        let overall = self.call(&overall_teams, &ranks, &overall_weights)?;

        for (team, ratings) in [team1, team2].into_iter().zip(&overall) {
            self.write_back(registry, &team.defense, RatingAxis::Overall, ratings[0], summary)?;
            self.write_back(registry, &team.offense, RatingAxis::Overall, ratings[1], summary)?;
        }

        // Roles: [def.defense, def.offense, off.defense, off.offense] per side
        let role_axes = [RatingAxis::Defense, RatingAxis::Offense];
        let role_teams = vec![
            self.current(registry, team1, &role_axes)?,
            self.current(registry, team2, &role_axes)?,
        ];
        let role_weights = vec![
            role_weights(team1.switched, k_team1).to_vec(),
            role_weights(team2.switched, k_team2).to_vec(),
        ];
        let roles = self.call(&role_teams, &ranks, &role_weights)?;

        for (team, ratings) in [team1, team2].into_iter().zip(&roles) {
            self.write_back(registry, &team.defense, RatingAxis::Defense, ratings[0], summary)?;
            self.write_back(registry, &team.defense, RatingAxis::Offense, ratings[1], summary)?;
            self.write_back(registry, &team.offense, RatingAxis::Defense, ratings[2], summary)?;
            self.write_back(registry, &team.offense, RatingAxis::Offense, ratings[3], summary)?;
        }

        debug!("Team 1: {}", team1);
        debug!("\tDEF: {}", registry.require(&team1.defense)?);
        debug!("\tOFF: {}", registry.require(&team1.offense)?);
        debug!("Team 2: {}", team2);
        debug!("\tDEF: {}", registry.require(&team2.defense)?);
        debug!("\tOFF: {}", registry.require(&team2.offense)?);

        Ok(())
    }

    /// Ratings on `axes` for the defense player, then the offense player
    fn current(
        &self,
        registry: &PlayerRegistry,
        team: &TeamResult,
        axes: &[RatingAxis],
    ) -> Result<Vec<RatingDistribution>> {
        let defense = registry.require(&team.defense)?;
        let offense = registry.require(&team.offense)?;
        Ok(axes
            .iter()
            .map(|&axis| defense.rating(axis))
            .chain(axes.iter().map(|&axis| offense.rating(axis)))
            .collect())
    }

    /// Invoke the collaborator and insist on a result shaped like the input
    fn call(
        &self,
        teams: &[Vec<RatingDistribution>],
        ranks: &[u32],
        weights: &[Vec<f64>],
    ) -> Result<TeamGroups> {
        let result = self.inference.rate(teams, ranks, weights)?;

        let same_shape = result.len() == teams.len()
            && result.iter().zip(teams).all(|(out, inp)| out.len() == inp.len());
        if !same_shape {
            return Err(RatingError::ContractViolation {
                reason: format!(
                    "sent team sizes {:?}, got back {:?}",
                    teams.iter().map(Vec::len).collect::<Vec<_>>(),
                    result.iter().map(Vec::len).collect::<Vec<_>>()
                ),
            }
            .into());
        }

        Ok(result)
    }

    fn write_back(
        &self,
        registry: &mut PlayerRegistry,
        name: &str,
        axis: RatingAxis,
        updated: RatingDistribution,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let player = registry.require_mut(name)?;
        let change = apply_update(player, axis, updated, self.change_tolerance);

        if change.significant {
            debug!(
                "Updating {} for {} : {}",
                axis,
                name,
                change.describe(|r| self.inference.expose(r))
            );
            summary.significant_changes.push(change);
        }

        Ok(())
    }
}
