//! Rating system integration using TrueSkill
//!
//! This module provides the rank-inference interface and its TrueSkill
//! implementation, K-factor strategies, the player registry, and the
//! orchestrator that folds match outcomes into player ratings.

pub mod inference;
pub mod k_factor;
pub mod orchestrator;
pub mod registry;
pub mod trueskill;

// Re-export commonly used types
pub use inference::{RankInference, RecordingRankInference};
pub use k_factor::{KStrategy, MIN_MARGIN_K};
pub use orchestrator::{predict_winner, RatingOrchestrator, RunSummary};
pub use registry::{apply_update, ChangeSummary, Player, PlayerRegistry};
pub use trueskill::{ExtendedTrueSkillConfig, TrueSkillInference};
