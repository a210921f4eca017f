//! Player registry
//!
//! The registry owns every player seen in a batch of matches. Ratings are only
//! ever replaced wholesale, through [`apply_update`], which reports what moved.

use crate::error::{RatingError, Result};
use crate::matches::Match;
use crate::types::{PlayerName, RatingAxis, RatingDistribution};
use crate::utils::{format_rating_change, within_tolerance};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A player and their three ratings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: PlayerName,
    rating: RatingDistribution,
    offense_rating: RatingDistribution,
    defense_rating: RatingDistribution,
    /// Matches rated for this player, in the order they were applied
    pub games: Vec<Match>,
}

impl Player {
    /// Create a new player with the same prior on all three axes
    pub fn new(name: impl Into<String>, prior: RatingDistribution) -> Self {
        Self {
            name: name.into(),
            rating: prior,
            offense_rating: prior,
            defense_rating: prior,
            games: Vec::new(),
        }
    }

    pub fn rating(&self, axis: RatingAxis) -> RatingDistribution {
        match axis {
            RatingAxis::Overall => self.rating,
            RatingAxis::Offense => self.offense_rating,
            RatingAxis::Defense => self.defense_rating,
        }
    }

    pub fn games_played(&self) -> usize {
        self.games.len()
    }

    fn slot_mut(&mut self, axis: RatingAxis) -> &mut RatingDistribution {
        match axis {
            RatingAxis::Overall => &mut self.rating,
            RatingAxis::Offense => &mut self.offense_rating,
            RatingAxis::Defense => &mut self.defense_rating,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: Rating:(mu={:.2}, sigma={:.2}) def_rating:(mu={:.2}, sigma={:.2}) off_rating:(mu={:.2}, sigma={:.2})",
            self.name,
            self.rating.mean,
            self.rating.uncertainty,
            self.defense_rating.mean,
            self.defense_rating.uncertainty,
            self.offense_rating.mean,
            self.offense_rating.uncertainty,
        )
    }
}

/// Record of one rating replacement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub player: PlayerName,
    pub axis: RatingAxis,
    pub previous: RatingDistribution,
    pub updated: RatingDistribution,
    /// Mean or uncertainty moved by more than the tolerance
    pub significant: bool,
}

impl ChangeSummary {
    pub fn mean_delta(&self) -> f64 {
        self.updated.mean - self.previous.mean
    }

    pub fn uncertainty_delta(&self) -> f64 {
        self.updated.uncertainty - self.previous.uncertainty
    }

    /// `Δμ=…, Δσ=…, ΔTS=…` using the given exposure
    pub fn describe(&self, expose: impl Fn(&RatingDistribution) -> f64) -> String {
        format_rating_change(&self.previous, &self.updated, expose)
    }
}

/// Replace one of `player`'s ratings and report the change
pub fn apply_update(
    player: &mut Player,
    axis: RatingAxis,
    updated: RatingDistribution,
    tolerance: f64,
) -> ChangeSummary {
    let slot = player.slot_mut(axis);
    let previous = std::mem::replace(slot, updated);

    let significant = !within_tolerance(previous.mean, updated.mean, tolerance)
        || !within_tolerance(previous.uncertainty, updated.uncertainty, tolerance);

    ChangeSummary {
        player: player.name.clone(),
        axis,
        previous,
        updated,
        significant,
    }
}

/// Every player of a run, keyed by name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerRegistry {
    players: HashMap<PlayerName, Player>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every distinct name appearing in `matches` with the given prior
    pub fn build(matches: &[Match], prior: RatingDistribution) -> Self {
        let mut registry = Self::new();
        for game in matches {
            for name in game.player_names() {
                registry.register(name, prior);
            }
        }
        registry
    }

    /// Add a player if the name is new; existing players are left alone
    pub fn register(&mut self, name: &str, prior: RatingDistribution) -> &Player {
        self.players
            .entry(name.to_string())
            .or_insert_with(|| Player::new(name, prior))
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.players.get(name)
    }

    /// Look up a player that must already be registered
    pub fn require(&self, name: &str) -> Result<&Player> {
        self.players.get(name).ok_or_else(|| {
            RatingError::PlayerNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    pub fn require_mut(&mut self, name: &str) -> Result<&mut Player> {
        self.players.get_mut(name).ok_or_else(|| {
            RatingError::PlayerNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::TeamResult;
    use chrono::NaiveDate;

    fn game(names: [&str; 4]) -> Match {
        Match::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            TeamResult::new(names[0], names[1], 10, false),
            TeamResult::new(names[2], names[3], 5, false),
        )
        .unwrap()
    }

    #[test]
    fn test_build_collects_distinct_names() {
        let matches = vec![game(["A", "B", "C", "D"]), game(["B", "E", "A", "C"])];
        let registry = PlayerRegistry::build(&matches, RatingDistribution::default());

        assert_eq!(registry.len(), 5);
        for name in ["A", "B", "C", "D", "E"] {
            let player = registry.get(name).unwrap();
            assert_eq!(player.rating(RatingAxis::Overall), RatingDistribution::default());
            assert_eq!(player.rating(RatingAxis::Offense), RatingDistribution::default());
            assert_eq!(player.rating(RatingAxis::Defense), RatingDistribution::default());
            assert_eq!(player.games_played(), 0);
        }
    }

    #[test]
    fn test_build_empty() {
        let registry = PlayerRegistry::build(&[], RatingDistribution::default());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_keeps_existing_player() {
        let mut registry = PlayerRegistry::new();
        registry.register("A", RatingDistribution::new(30.0, 2.0));
        registry.register("A", RatingDistribution::default());
        assert_eq!(
            registry.get("A").unwrap().rating(RatingAxis::Overall).mean,
            30.0
        );
    }

    #[test]
    fn test_require_missing_player() {
        let registry = PlayerRegistry::new();
        let err = registry.require("ghost").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::PlayerNotFound { name }) if name == "ghost"
        ));
    }

    #[test]
    fn test_apply_update_replaces_and_reports() {
        let mut player = Player::new("A", RatingDistribution::new(25.0, 8.0));

        let change = apply_update(
            &mut player,
            RatingAxis::Defense,
            RatingDistribution::new(26.5, 7.5),
            0.01,
        );
        assert!(change.significant);
        assert_eq!(change.previous, RatingDistribution::new(25.0, 8.0));
        assert_eq!(player.rating(RatingAxis::Defense), RatingDistribution::new(26.5, 7.5));
        assert_eq!(player.rating(RatingAxis::Offense), RatingDistribution::new(25.0, 8.0));
        assert!((change.mean_delta() - 1.5).abs() < 1e-12);
        assert!((change.uncertainty_delta() + 0.5).abs() < 1e-12);

        let change = apply_update(
            &mut player,
            RatingAxis::Defense,
            RatingDistribution::new(26.505, 7.5),
            0.01,
        );
        assert!(!change.significant);
        assert_eq!(player.rating(RatingAxis::Defense).mean, 26.505);
    }

    #[test]
    fn test_change_description() {
        let mut player = Player::new("A", RatingDistribution::new(25.0, 8.0));
        let change = apply_update(
            &mut player,
            RatingAxis::Overall,
            RatingDistribution::new(27.0, 7.0),
            0.01,
        );
        let text = change.describe(|r| r.mean - 3.0 * r.uncertainty);
        assert_eq!(text, "Δμ=+2.00, Δσ=-1.00, ΔTS=+5.00");
    }
}
