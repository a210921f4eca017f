//! Performance benchmarks for rating calculations

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use foosball_ratings::leaderboard::LeaderboardBuilder;
use foosball_ratings::matches::{Match, TeamResult};
use foosball_ratings::rating::{
    ExtendedTrueSkillConfig, KStrategy, RankInference, RatingOrchestrator, TrueSkillInference,
};
use foosball_ratings::types::RatingDistribution;
use std::sync::Arc;

const PLAYERS: [&str; 12] = [
    "Anna", "Bram", "Cas", "Daan", "Eva", "Fenna", "Guus", "Hanna", "Ivo", "Jet", "Kees", "Lot",
];

/// Deterministic season where the same pairings rotate through
fn create_bench_season(len: usize) -> Vec<Match> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..len)
        .map(|i| {
            let pick = |offset: usize| PLAYERS[(i * 5 + offset * 3) % PLAYERS.len()];
            let loser_score = (i % 10) as u32;
            let (score1, score2) = if i % 3 == 0 {
                (loser_score, 10)
            } else {
                (10, loser_score)
            };
            Match::new(
                start + chrono::Days::new(i as u64 / 4),
                TeamResult::new(pick(0), pick(1), score1, i % 7 == 0),
                TeamResult::new(pick(2), pick(3), score2, i % 11 == 0),
            )
            .unwrap()
        })
        .collect()
}

fn create_inference() -> Arc<TrueSkillInference> {
    Arc::new(TrueSkillInference::new(ExtendedTrueSkillConfig::default()).unwrap())
}

fn bench_rank_inference(c: &mut Criterion) {
    let inference = create_inference();
    let teams = vec![vec![RatingDistribution::default(); 4]; 2];
    let weights = vec![vec![1.0, 0.0, 0.0, 1.0], vec![0.5; 4]];

    c.bench_function("trueskill_role_update", |b| {
        b.iter(|| {
            inference
                .rate(black_box(&teams), black_box(&[1, 2]), black_box(&weights))
                .unwrap()
        })
    });
}

fn bench_season(c: &mut Criterion) {
    let inference = create_inference();
    let season = create_bench_season(500);

    for strategy in [KStrategy::Constant, KStrategy::ByMargin, KStrategy::ShutoutDoubleGame] {
        let orchestrator = RatingOrchestrator::new(inference.clone(), strategy);
        c.bench_function(&format!("rate_season_500_{}", strategy), |b| {
            b.iter(|| orchestrator.rate_all(black_box(&season)).unwrap())
        });
    }
}

fn bench_leaderboards(c: &mut Criterion) {
    let inference = create_inference();
    let season = create_bench_season(500);
    let orchestrator = RatingOrchestrator::new(inference.clone(), KStrategy::Constant);
    let (registry, _) = orchestrator.rate_all(&season).unwrap();
    let builder = LeaderboardBuilder::new(inference, 1.0);

    c.bench_function("build_leaderboards", |b| {
        b.iter(|| builder.build(black_box(&registry)))
    });
}

criterion_group!(
    benches,
    bench_rank_inference,
    bench_season,
    bench_leaderboards
);
criterion_main!(benches);
