//! Test fixtures shared by the integration tests

#![allow(dead_code)]

use foosball_ratings::config::AppConfig;
use foosball_ratings::leaderboard::MemoryReportSink;
use foosball_ratings::matches::InMemoryMatchSource;
use foosball_ratings::rating::RecordingRankInference;
use foosball_ratings::{KStrategy, RatingPipeline};
use std::sync::Arc;

/// One match row: date, team 1 (def, off), team 2 (def, off), scores, switch flags
pub fn row(
    date: &str,
    team1: (&str, &str),
    team2: (&str, &str),
    scores: (&str, &str),
    switched: (bool, bool),
) -> Vec<String> {
    let flag = |switched: bool| if switched { "Ja" } else { "Nee" };
    vec![
        date.to_string(),
        team1.0.to_string(),
        team1.1.to_string(),
        team2.0.to_string(),
        team2.1.to_string(),
        scores.0.to_string(),
        scores.1.to_string(),
        flag(switched.0).to_string(),
        flag(switched.1).to_string(),
    ]
}

/// A small office season: Anna and Bram are the strong pair
pub fn season_rows() -> Vec<Vec<String>> {
    vec![
        row("08/01/2024", ("Anna", "Bram"), ("Cas", "Daan"), ("10", "4"), (false, false)),
        row("09/01/2024", ("Cas", "Eva"), ("Anna", "Bram"), ("3", "10"), (false, false)),
        row("10/01/2024", ("Daan", "Eva"), ("Bram", "Anna"), ("0", "10"), (false, true)),
        row("11/01/2024", ("Anna", "Cas"), ("Bram", "Daan"), ("10", "8"), (false, false)),
        row("12/01/2024", ("Eva", "Cas"), ("Daan", "Bram"), ("6", "10"), (true, false)),
        row("15/01/2024", ("Anna", "Bram"), ("Eva", "Daan"), ("10", "forfeit"), (false, false)),
    ]
}

pub fn config_with(strategy: KStrategy) -> AppConfig {
    let mut config = AppConfig::default();
    config.rating.strategy = strategy;
    config
}

/// Pipeline using the real TrueSkill inference and an in-memory sink
pub fn trueskill_pipeline(
    rows: Vec<Vec<String>>,
    strategy: KStrategy,
) -> (RatingPipeline, Arc<MemoryReportSink>) {
    let sink = Arc::new(MemoryReportSink::new());
    let pipeline = RatingPipeline::new(
        config_with(strategy),
        Arc::new(InMemoryMatchSource::new(rows)),
        sink.clone(),
    )
    .unwrap();
    (pipeline, sink)
}

/// Pipeline using the recording stub inference
pub fn recording_pipeline(
    rows: Vec<Vec<String>>,
    strategy: KStrategy,
) -> (RatingPipeline, Arc<RecordingRankInference>, Arc<MemoryReportSink>) {
    let inference = Arc::new(RecordingRankInference::new());
    let sink = Arc::new(MemoryReportSink::new());
    let pipeline = RatingPipeline::with_inference(
        config_with(strategy),
        inference.clone(),
        Arc::new(InMemoryMatchSource::new(rows)),
        sink.clone(),
    );
    (pipeline, inference, sink)
}
