//! Unit tests for the quality module.
//!
//! Tests cover:
//! - precision/recall/hit against golden sets
//! - golden repositories (file and in-memory)
//! - tuning sweeps over the sample universe

use peerlab::engine::{Candidate, PeerEngine, PrecomputedSemanticScorer, TargetProfile, TuningParams};
use peerlab::quality::{
    FileGoldenRepository, GoldenPeerSet, GoldenRepository, InMemoryGoldenRepository, TuningGrid,
};
use peerlab::test_utils::fixtures::UnitTestFixture;
use peerlab::universe::StaticUniverse;

fn sample() -> (UnitTestFixture, StaticUniverse, FileGoldenRepository) {
    let fixture = UnitTestFixture::new().with_sample_data();
    let universe = StaticUniverse::from_file(fixture.data_path.join("universe.toml"))
        .expect("load universe");
    let golden = FileGoldenRepository::open(fixture.data_path.join("golden.toml"))
        .expect("load golden sets");
    (fixture, universe, golden)
}

#[test]
fn listed_target_one_of_two_golden_peers() {
    let (_fixture, universe, golden) = sample();
    let set = golden.get("samsung-core").unwrap();
    let target = universe.listed_target("005930").unwrap();

    let eval = PeerEngine::default()
        .evaluate_quality(&target, universe.all(), &TuningParams::default(), &set)
        .unwrap();

    // Only SK Hynix sits inside 0.5x-2x of Samsung's revenue.
    assert_eq!(eval.result.ids().collect::<Vec<_>>(), vec!["000660"]);
    assert_eq!(eval.metrics.k, 5);
    assert_eq!(eval.metrics.precision_at_k, 0.2);
    assert_eq!(eval.metrics.recall_at_k, 0.5);
    assert!(eval.metrics.hit_at_k);
    assert_eq!(eval.target_label, "Samsung Electronics");
}

#[test]
fn zero_top_k_yields_zero_metrics() {
    let (_fixture, universe, golden) = sample();
    let set = golden.get("samsung-core").unwrap();
    let target = universe.listed_target("005930").unwrap();
    let params = TuningParams {
        top_k: 0,
        ..TuningParams::default()
    };

    let eval = PeerEngine::default()
        .evaluate_quality(&target, universe.all(), &params, &set)
        .unwrap();
    assert!(eval.result.is_empty());
    assert_eq!(eval.metrics.precision_at_k, 0.0);
    assert_eq!(eval.metrics.recall_at_k, 0.0);
    assert!(!eval.metrics.hit_at_k);
}

#[test]
fn empty_golden_set_has_zero_recall() {
    let candidates = vec![Candidate::new("a", "A", "KOSPI", &["memory"], None)];
    let engine = PeerEngine::new(Box::new(PrecomputedSemanticScorer::new().with_score("a", 0.5)));
    let target = TargetProfile::virtual_target("v", "memory", None);
    let golden = GoldenPeerSet::new("empty", "v", &[]);

    let eval = engine
        .evaluate_quality(&target, &candidates, &TuningParams::default(), &golden)
        .unwrap();
    assert_eq!(eval.result.len(), 1);
    assert_eq!(eval.metrics.recall_at_k, 0.0);
    assert_eq!(eval.metrics.num_golden, 0);
}

#[test]
fn in_memory_and_file_repositories_agree() {
    let (_fixture, _universe, golden) = sample();
    let memory = InMemoryGoldenRepository::new(golden.list().unwrap());
    assert_eq!(memory.list().unwrap(), golden.list().unwrap());
    assert_eq!(
        memory.get("virtual-fab").unwrap(),
        golden.get("virtual-fab").unwrap()
    );
    assert_eq!(golden.get("virtual-fab").unwrap().target_id, None);
}

#[test]
fn sweep_over_sample_universe_is_sorted_and_complete() {
    let (_fixture, universe, golden) = sample();
    let set = golden.get("virtual-fab").unwrap();
    let target = TargetProfile::virtual_target(
        "Fab startup",
        "semiconductor equipment test socket",
        Some(400_000_000_000.0),
    );
    let grid = TuningGrid::default();

    let outcomes = PeerEngine::default()
        .sweep(&target, universe.all(), &set, &grid)
        .unwrap();
    assert_eq!(outcomes.len(), grid.len());
    for pair in outcomes.windows(2) {
        let (a, b) = (&pair[0].metrics, &pair[1].metrics);
        assert!(
            a.recall_at_k > b.recall_at_k
                || (a.recall_at_k == b.recall_at_k && a.precision_at_k >= b.precision_at_k)
        );
    }
    // Hanmi (0.56T) and Leeno (0.25T) both fit 0.5x-2x of 0.4T.
    assert_eq!(outcomes[0].metrics.recall_at_k, 1.0);
}

#[test]
fn sweep_is_repeatable() {
    let (_fixture, universe, golden) = sample();
    let set = golden.get("samsung-core").unwrap();
    let target = universe.listed_target("Samsung Electronics").unwrap();
    let engine = PeerEngine::default();
    let grid = TuningGrid::default();

    let first = engine.sweep(&target, universe.all(), &set, &grid).unwrap();
    let second = engine.sweep(&target, universe.all(), &set, &grid).unwrap();
    assert_eq!(first, second);
}
