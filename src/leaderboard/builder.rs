//! Ratings table and role leaderboards
//!
//! Every report ranks players by an exposed rating, highest first. The two
//! role leaderboards stop at the first player below the threshold.

use crate::rating::{Player, PlayerRegistry, RankInference};
use crate::types::{PlayerName, RatingAxis, RatingDistribution};
use crate::utils::{current_timestamp, report_timestamp};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

/// One rating with its exposed value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposedRating {
    pub mean: f64,
    pub uncertainty: f64,
    pub exposed: f64,
}

/// One row of the full ratings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingsRow {
    pub name: PlayerName,
    pub overall: ExposedRating,
    pub offense: ExposedRating,
    pub defense: ExposedRating,
}

/// One row of a role leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: PlayerName,
    pub exposed: f64,
}

/// Plain tabular rendering of a report, header first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    /// Header followed by every row
    pub fn all_rows(&self) -> impl Iterator<Item = &Vec<String>> {
        std::iter::once(&self.header).chain(self.rows.iter())
    }
}

/// All three reports of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboards {
    pub ratings: Vec<RatingsRow>,
    pub offense: Vec<LeaderboardEntry>,
    pub defense: Vec<LeaderboardEntry>,
}

/// Builds reports from a finished registry
pub struct LeaderboardBuilder {
    inference: Arc<dyn RankInference>,
    threshold: f64,
}

impl LeaderboardBuilder {
    pub fn new(inference: Arc<dyn RankInference>, threshold: f64) -> Self {
        Self {
            inference,
            threshold,
        }
    }

    fn expose(&self, rating: RatingDistribution) -> ExposedRating {
        ExposedRating {
            mean: rating.mean,
            uncertainty: rating.uncertainty,
            exposed: self.inference.expose(&rating),
        }
    }

    /// Players sorted by exposed rating on `axis`, highest first, ties by name
    fn ranked_by<'a>(&self, registry: &'a PlayerRegistry, axis: RatingAxis) -> Vec<(&'a Player, f64)> {
        let mut ranked: Vec<(&Player, f64)> = registry
            .players()
            .map(|player| (player, self.inference.expose(&player.rating(axis))))
            .collect();
        ranked.sort_by(|(a, a_exposed), (b, b_exposed)| {
            b_exposed
                .partial_cmp(a_exposed)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        ranked
    }

    /// Full table, never truncated
    pub fn ratings(&self, registry: &PlayerRegistry) -> Vec<RatingsRow> {
        self.ranked_by(registry, RatingAxis::Overall)
            .into_iter()
            .map(|(player, _)| RatingsRow {
                name: player.name.clone(),
                overall: self.expose(player.rating(RatingAxis::Overall)),
                offense: self.expose(player.rating(RatingAxis::Offense)),
                defense: self.expose(player.rating(RatingAxis::Defense)),
            })
            .collect()
    }

    pub fn offensive(&self, registry: &PlayerRegistry) -> Vec<LeaderboardEntry> {
        self.role_board(registry, RatingAxis::Offense)
    }

    pub fn defensive(&self, registry: &PlayerRegistry) -> Vec<LeaderboardEntry> {
        self.role_board(registry, RatingAxis::Defense)
    }

    fn role_board(&self, registry: &PlayerRegistry, axis: RatingAxis) -> Vec<LeaderboardEntry> {
        let ranked = self
            .ranked_by(registry, axis)
            .into_iter()
            .map(|(player, exposed)| LeaderboardEntry {
                name: player.name.clone(),
                exposed,
            })
            .collect();
        truncate_below(ranked, self.threshold)
    }

    pub fn build(&self, registry: &PlayerRegistry) -> Leaderboards {
        Leaderboards {
            ratings: self.ratings(registry),
            offense: self.offensive(registry),
            defense: self.defensive(registry),
        }
    }
}

/// Keep entries up to the first one below `threshold`; input must be sorted descending
pub fn truncate_below(entries: Vec<LeaderboardEntry>, threshold: f64) -> Vec<LeaderboardEntry> {
    entries
        .into_iter()
        .take_while(|entry| entry.exposed >= threshold)
        .collect()
}

impl Leaderboards {
    /// Ratings table with a `Last Updated` stamp in the header
    pub fn ratings_table(&self) -> ReportTable {
        let mut header: Vec<String> = [
            "Player",
            "Skill_Estimate(µ)",
            "Confidence(σ)",
            "99%_TrueSkill",
            "µ_off",
            "σ_off",
            "99ts_off",
            "µ_def",
            "σ_def",
            "99ts_def",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        header.push(format!(
            "Last Updated: {}",
            report_timestamp(&current_timestamp())
        ));

        let rows = self
            .ratings
            .iter()
            .map(|row| {
                let mut cells = vec![row.name.clone()];
                for rating in [row.overall, row.offense, row.defense] {
                    cells.push(number(rating.mean));
                    cells.push(number(rating.uncertainty));
                    cells.push(number(rating.exposed));
                }
                cells
            })
            .collect();

        ReportTable { header, rows }
    }

    pub fn offensive_table(&self) -> ReportTable {
        board_table("Offensive Rating", &self.offense)
    }

    pub fn defensive_table(&self) -> ReportTable {
        board_table("Defensive Rating", &self.defense)
    }
}

fn board_table(title: &str, entries: &[LeaderboardEntry]) -> ReportTable {
    ReportTable {
        header: vec!["Player".to_string(), title.to_string()],
        rows: entries
            .iter()
            .map(|entry| vec![entry.name.clone(), number(entry.exposed)])
            .collect(),
    }
}

fn number(value: f64) -> String {
    format!("{:.4}", value)
}
