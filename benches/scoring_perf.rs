//! Criterion benchmarks for peer scoring.
//!
//! Performance targets:
//! - score_peers over 1,000 candidates: < 5ms
//! - Default tuning sweep (18 runs) over 1,000 candidates: < 100ms

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use peerlab::engine::scorer::keyword_score;
use peerlab::engine::{
    Candidate, HashEmbeddingScorer, PeerEngine, ScoringOptions, TargetProfile, extract_features,
};
use peerlab::quality::{GoldenPeerSet, TuningGrid};

const WORDS: &[&str] = &[
    "semiconductor",
    "memory",
    "battery",
    "platform",
    "auto",
    "bank",
    "display",
    "cloud",
    "biotech",
    "shipbuilding",
];

fn synthetic_pool(size: usize) -> Vec<Candidate> {
    (0..size)
        .map(|i| {
            let keywords = [WORDS[i % WORDS.len()], WORDS[(i * 7 + 3) % WORDS.len()]];
            let market = if i % 3 == 0 { "KOSDAQ" } else { "KOSPI" };
            let scale = 1.0e9 * ((i % 97) as f64 + 1.0);
            Candidate::new(format!("{i:06}"), format!("Company {i}"), market, &keywords, Some(scale))
        })
        .collect()
}

fn target() -> TargetProfile {
    TargetProfile::virtual_target(
        "Bench",
        "memory semiconductor display panel maker",
        Some(40.0e9),
    )
}

// =============================================================================
// Scoring Benchmarks
// =============================================================================

fn scoring_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_peers");
    let target = target();
    let options = ScoringOptions::default();

    for size in [100usize, 1_000] {
        let pool = synthetic_pool(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("heuristic", size), &pool, |b, pool| {
            let engine = PeerEngine::default();
            b.iter(|| engine.score_peers(black_box(&target), black_box(pool), &options));
        });

        group.bench_with_input(BenchmarkId::new("hash", size), &pool, |b, pool| {
            let engine = PeerEngine::new(Box::new(HashEmbeddingScorer::new(256)));
            b.iter(|| engine.score_peers(black_box(&target), black_box(pool), &options));
        });
    }

    group.finish();
}

fn keyword_benchmarks(c: &mut Criterion) {
    let query = extract_features("memory semiconductor display panel maker");
    let keywords: Vec<String> = WORDS.iter().map(|w| (*w).to_string()).collect();

    c.bench_function("keyword_score", |b| {
        b.iter(|| keyword_score(black_box(&query), black_box(&keywords)));
    });
}

// =============================================================================
// Tuning Benchmarks
// =============================================================================

fn tuning_benchmarks(c: &mut Criterion) {
    let pool = synthetic_pool(1_000);
    let target = target();
    let golden = GoldenPeerSet::new("bench", "Bench", &["000001", "000011", "000021"]);
    let grid = TuningGrid::default();
    let engine = PeerEngine::default();

    c.bench_function("sweep_default_grid", |b| {
        b.iter(|| engine.sweep(black_box(&target), black_box(&pool), &golden, &grid));
    });
}

criterion_group!(
    benches,
    scoring_benchmarks,
    keyword_benchmarks,
    tuning_benchmarks
);
criterion_main!(benches);
