use std::fs;
use std::path::PathBuf;

use peerlab::config::Config;
use peerlab::engine::{MarketFilter, ScaleBand, ScoringWeights};
use peerlab::test_utils::fixtures::UnitTestFixture;
use peerlab::test_utils::{TestCase, run_table_tests};

fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn load_fixture(relative: &str) -> Config {
    let content = fs::read_to_string(fixture_path(relative)).expect("read fixture");
    Config::from_toml_str(&content).expect("parse config")
}

#[test]
fn config_scoring_filter_from_fixture() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "default",
            input: "tests/fixtures/configs/default.toml",
            expected: (None, 0.99, ScaleBand::new(0.5, 2.0), MarketFilter::All, 5usize),
            should_panic: false,
        },
        TestCase {
            name: "tuned",
            input: "tests/fixtures/configs/tuned.toml",
            expected: (
                Some(ScoringWeights::new(0.3, 0.7)),
                0.95,
                ScaleBand::new(0.25, 4.0),
                MarketFilter::Segment("KOSDAQ".to_string()),
                10usize,
            ),
            should_panic: false,
        },
    ];

    run_table_tests(cases, |relative_path| {
        let config = load_fixture(relative_path);
        let options = config.scoring_options();
        (
            options.weights,
            config.scoring.similarity_cap,
            options.band,
            options.market,
            options.top_k,
        )
    })
}

#[test]
fn config_semantic_and_data_from_fixture() {
    let config = load_fixture("tests/fixtures/configs/tuned.toml");
    assert_eq!(config.semantic.backend, "hash");
    assert_eq!(config.semantic.embedding_dims, 128);
    assert_eq!(config.data.universe_path, "data/universe.json");
    // Untouched sections keep their defaults.
    assert_eq!(config.filter.relevance_floor, 0.1);
}

#[test]
fn config_rejects_inverted_band() {
    let content = fs::read_to_string(fixture_path("tests/fixtures/configs/invalid_band.toml"))
        .expect("read fixture");
    let err = Config::from_toml_str(&content).unwrap_err();
    assert_eq!(err.code(), "config_error");
    assert!(err.to_string().contains("band"));
}

#[test]
fn config_rejects_malformed_toml() {
    assert!(Config::from_toml_str("[filter\nband_low = ").is_err());
}

#[test]
fn explicit_config_file_is_used() {
    let fixture = UnitTestFixture::new();
    let path = fixture.create_file("custom.toml", "[ranking]\ntop_k = 3\n");
    let config = Config::load(Some(&path), &fixture.data_path).expect("load config");
    assert_eq!(config.ranking.top_k, 3);
    assert_eq!(config.scoring_options().top_k, 3);
}

#[test]
fn missing_explicit_config_falls_back_to_defaults() {
    let fixture = UnitTestFixture::new();
    let config = Config::load(Some(&fixture.data_path.join("absent.toml")), &fixture.data_path)
        .expect("load config");
    assert_eq!(config.ranking.top_k, 5);
    assert_eq!(config.semantic.backend, "heuristic");
}
