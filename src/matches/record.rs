//! Typed match records parsed from tabular rows
//!
//! A row carries nine ordered fields: date, team 1 defense, team 1 offense,
//! team 2 defense, team 2 offense, team 1 score, team 2 score, team 1
//! switched flag, team 2 switched flag.

use crate::config::InputSettings;
use crate::error::{RatingError, Result};
use crate::types::{PlayerName, Role, Side};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of leading fields a row must carry; the two switched flags may be absent
const REQUIRED_FIELDS: usize = 7;

/// How raw row cells are interpreted
#[derive(Debug, Clone)]
pub struct RowFormat {
    pub date_format: String,
    pub switched_marker: String,
    pub forfeit_score: u32,
}

impl Default for RowFormat {
    fn default() -> Self {
        Self {
            date_format: "%d/%m/%Y".to_string(),
            switched_marker: "Ja".to_string(),
            forfeit_score: 9,
        }
    }
}

impl From<&InputSettings> for RowFormat {
    fn from(settings: &InputSettings) -> Self {
        Self {
            date_format: settings.date_format.clone(),
            switched_marker: settings.switched_marker.clone(),
            forfeit_score: settings.forfeit_score,
        }
    }
}

/// One team's participation in one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamResult {
    pub defense: PlayerName,
    pub offense: PlayerName,
    pub score: u32,
    /// The two players exchanged roles partway through
    pub switched: bool,
}

impl TeamResult {
    pub fn new(defense: impl Into<String>, offense: impl Into<String>, score: u32, switched: bool) -> Self {
        Self {
            defense: defense.into(),
            offense: offense.into(),
            score,
            switched,
        }
    }

    /// Name of the player nominally in `role`
    pub fn player(&self, role: Role) -> &PlayerName {
        match role {
            Role::Defense => &self.defense,
            Role::Offense => &self.offense,
        }
    }
}

impl std::fmt::Display for TeamResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DEF:{} OFF:{} score:{}{}",
            self.defense,
            self.offense,
            self.score,
            if self.switched { " Switched" } else { "" }
        )
    }
}

/// A single played match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub date: NaiveDate,
    pub team1: TeamResult,
    pub team2: TeamResult,
}

impl Match {
    /// Build a match, rejecting one that names the same player twice
    pub fn new(date: NaiveDate, team1: TeamResult, team2: TeamResult) -> Result<Self> {
        let game = Self { date, team1, team2 };
        let names = game.player_names();
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(RatingError::DuplicatePlayer {
                    name: name.to_string(),
                }
                .into());
            }
        }
        Ok(game)
    }

    /// Parse a raw row. An unparseable date is fatal; an unparseable score is not.
    pub fn from_row<S: AsRef<str>>(row: &[S], format: &RowFormat) -> Result<Self> {
        if row.len() < REQUIRED_FIELDS {
            return Err(RatingError::MalformedRow {
                reason: format!(
                    "expected at least {} fields, got {}",
                    REQUIRED_FIELDS,
                    row.len()
                ),
            }
            .into());
        }

        let cell = |i: usize| row.get(i).map(|s| s.as_ref().trim()).unwrap_or("");

        let date = NaiveDate::parse_from_str(cell(0), &format.date_format).map_err(|_| {
            RatingError::InvalidDate {
                value: cell(0).to_string(),
                format: format.date_format.clone(),
            }
        })?;

        let team1 = TeamResult::new(
            cell(1),
            cell(2),
            parse_score(cell(5), format.forfeit_score),
            cell(7) == format.switched_marker,
        );
        let team2 = TeamResult::new(
            cell(3),
            cell(4),
            parse_score(cell(6), format.forfeit_score),
            cell(8) == format.switched_marker,
        );

        Self::new(date, team1, team2)
    }

    /// Either team failed to score
    pub fn is_shutout(&self) -> bool {
        self.team1.score == 0 || self.team2.score == 0
    }

    /// `(losing_score, winning_score)`
    pub fn score_bounds(&self) -> (u32, u32) {
        let (a, b) = (self.team1.score, self.team2.score);
        (a.min(b), a.max(b))
    }

    /// The winning side, or `None` for a draw
    pub fn winner(&self) -> Option<Side> {
        match self.team1.score.cmp(&self.team2.score) {
            std::cmp::Ordering::Greater => Some(Side::Team1),
            std::cmp::Ordering::Less => Some(Side::Team2),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// All four names, team 1 first, defense before offense
    pub fn player_names(&self) -> [&PlayerName; 4] {
        [
            &self.team1.defense,
            &self.team1.offense,
            &self.team2.defense,
            &self.team2.offense,
        ]
    }
}

impl std::fmt::Display for Match {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: Team 1:({}) Team 2:({})",
            self.date, self.team1, self.team2
        )
    }
}

/// Unparseable score => score := `fallback` (forfeit markers and the like)
pub fn parse_score(value: &str, fallback: u32) -> u32 {
    value.trim().parse().unwrap_or(fallback)
}
