use peerlab::engine::filter::{ScaleCheck, check_scale};
use peerlab::engine::scorer::keyword_score;
use peerlab::engine::{
    Candidate, ExclusionReason, InclusionStatus, PeerEngine, PrecomputedSemanticScorer,
    ScaleBand, ScoringOptions, TargetProfile, extract_features,
};
use peerlab::test_utils::fixtures::UnitTestFixture;
use peerlab::test_utils::logging::{captured_for, init_test_logging};
use peerlab::test_utils::{TestCase, run_table_tests};
use peerlab::universe::StaticUniverse;

#[test]
fn scale_band_table() -> Result<(), String> {
    let cases = vec![
        TestCase::new("inside", (Some(1_000_000.0), Some(2_000_000.0)), true),
        TestCase::new("above", (Some(1_000_000.0), Some(3_000_000.0)), false),
        TestCase::new("lower edge", (Some(1_000_000.0), Some(500_000.0)), true),
        TestCase::new("below", (Some(1_000_000.0), Some(499_999.0)), false),
        TestCase::new("no target scale", (None, Some(3_000_000.0)), true),
        TestCase::new("missing candidate scale", (Some(1_000_000.0), None), false),
    ];

    run_table_tests(cases, |(target, candidate)| {
        check_scale(target, candidate, &ScaleBand::default()).passes()
    })
}

#[test]
fn band_bounds_are_reported() {
    match check_scale(Some(1_000_000.0), Some(3_000_000.0), &ScaleBand::default()) {
        ScaleCheck::OutOfBand { lower, upper } => {
            assert_eq!(lower, 500_000.0);
            assert_eq!(upper, 2_000_000.0);
        }
        other => panic!("unexpected check: {other:?}"),
    }
}

#[test]
fn single_token_match_scores_one() {
    let query = extract_features("semiconductor");
    let keywords = vec!["Semiconductor".to_string(), "memory".to_string()];
    assert_eq!(keyword_score(&query, &keywords), 1.0);
}

#[test]
fn diagnostics_precedence_over_sample_universe() {
    let fixture = UnitTestFixture::new().with_sample_data();
    let universe = StaticUniverse::from_file(fixture.data_path.join("universe.toml")).unwrap();
    let engine = PeerEngine::default();
    let target = universe.listed_target("005930").unwrap();
    let options = ScoringOptions::default();

    let broken = engine
        .diagnose_exclusion(&target, "Broken Filing Co", universe.all(), &options)
        .unwrap();
    assert_eq!(broken.reason_code(), Some("DATA_PARSING_ERROR"));

    let naver = engine
        .diagnose_exclusion(&target, "NAVER", universe.all(), &options)
        .unwrap();
    assert!(matches!(
        naver.reason,
        Some(ExclusionReason::ScaleMismatch { .. })
    ));

    let hynix = engine
        .diagnose_exclusion(&target, "000660", universe.all(), &options)
        .unwrap();
    assert_eq!(hynix.status, InclusionStatus::Included);
    assert_eq!(hynix.rank, Some(1));

    let missing = engine
        .diagnose_exclusion(&target, "LG Electronics", universe.all(), &options)
        .unwrap();
    assert_eq!(missing.reason, Some(ExclusionReason::NotFound));
}

#[test]
fn scoring_run_emits_structured_log() {
    init_test_logging("engine=info");
    let candidates = vec![Candidate::new("a", "Alpha Chips", "KOSPI", &["memory"], None)];
    let engine = PeerEngine::new(Box::new(PrecomputedSemanticScorer::new().with_score("a", 0.4)));
    let target = TargetProfile::virtual_target("LoggedTarget", "memory", None);

    engine
        .score_peers(&target, &candidates, &ScoringOptions::default())
        .unwrap();

    let entries = captured_for("engine");
    assert!(entries.iter().any(|entry| {
        entry.message == "scored peers"
            && entry.field("label") == Some("Virtual - LoggedTarget")
            && entry.field("ranked") == Some("1")
    }));
}
