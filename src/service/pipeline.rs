//! Rating pipeline
//!
//! Wires a match source, the orchestrator and a report sink together for a
//! single batch run. Nothing is written unless every match was rated.

use crate::config::AppConfig;
use crate::error::Result;
use crate::leaderboard::{LeaderboardBuilder, Leaderboards, ReportDestination, ReportSink};
use crate::matches::{fetch_matches, MatchSource, RowFormat};
use crate::rating::{
    ExtendedTrueSkillConfig, PlayerRegistry, RankInference, RatingOrchestrator, RunSummary,
    TrueSkillInference,
};
use std::sync::Arc;
use tracing::info;

/// Everything a finished run produced
#[derive(Debug)]
pub struct PipelineReport {
    pub registry: PlayerRegistry,
    pub summary: RunSummary,
    pub leaderboards: Leaderboards,
}

/// Collaborators and settings for one run
pub struct RatingPipeline {
    config: AppConfig,
    inference: Arc<dyn RankInference>,
    source: Arc<dyn MatchSource>,
    sink: Arc<dyn ReportSink>,
}

impl RatingPipeline {
    /// Pipeline using TrueSkill as the rank inference
    pub fn new(
        config: AppConfig,
        source: Arc<dyn MatchSource>,
        sink: Arc<dyn ReportSink>,
    ) -> Result<Self> {
        let inference = TrueSkillInference::new(ExtendedTrueSkillConfig::from(&config.rating))?;
        Ok(Self::with_inference(
            config,
            Arc::new(inference),
            source,
            sink,
        ))
    }

    pub fn with_inference(
        config: AppConfig,
        inference: Arc<dyn RankInference>,
        source: Arc<dyn MatchSource>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            config,
            inference,
            source,
            sink,
        }
    }

    /// Fetch, rate, build reports and write them
    pub fn run(&self) -> Result<PipelineReport> {
        let format = RowFormat::from(&self.config.input);
        let matches = fetch_matches(self.source.as_ref(), &format)?;
        info!("Parsed {} matches", matches.len());

        let orchestrator = RatingOrchestrator::new(self.inference.clone(), self.config.rating.strategy)
            .with_change_tolerance(self.config.rating.change_tolerance);
        let (registry, summary) = orchestrator.rate_all(&matches)?;
        info!("Rated {} players", registry.len());

        let leaderboards = LeaderboardBuilder::new(
            self.inference.clone(),
            self.config.output.leaderboard_threshold,
        )
        .build(&registry);

        self.sink
            .write_report(&leaderboards.ratings_table(), ReportDestination::Ratings)?;
        self.sink.write_report(
            &leaderboards.offensive_table(),
            ReportDestination::OffensiveLeaderboard,
        )?;
        self.sink.write_report(
            &leaderboards.defensive_table(),
            ReportDestination::DefensiveLeaderboard,
        )?;

        Ok(PipelineReport {
            registry,
            summary,
            leaderboards,
        })
    }
}
