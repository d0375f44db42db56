use peerlab::engine::{Candidate, HashEmbeddingScorer, SemanticScorer, extract_features};
use peerlab::test_utils::{TestCase, run_table_tests};

#[test]
fn hash_embedding_dimensions_table() -> Result<(), String> {
    let cases = vec![
        TestCase::new("dims_32", (32usize, "memory semiconductor"), 32usize),
        TestCase::new("dims_256", (256usize, "online brokerage platform"), 256usize),
        TestCase::new("dims_zero_clamped", (0usize, "auto parts"), 1usize),
    ];

    run_table_tests(cases, |(dims, text)| {
        let scorer = HashEmbeddingScorer::new(dims);
        scorer.embed(text.split_whitespace()).len()
    })
}

#[test]
fn related_business_outscores_unrelated() {
    let scorer = HashEmbeddingScorer::new(256);
    let query = extract_features("memory semiconductor dram");
    let chipmaker = Candidate::new(
        "000660",
        "SK Hynix",
        "KOSPI",
        &["semiconductor", "memory", "dram"],
        None,
    );
    let carmaker = Candidate::new("000270", "Kia", "KOSPI", &["auto", "vehicle"], None);

    let related = scorer.score(&query, &chipmaker).unwrap();
    let unrelated = scorer.score(&query, &carmaker).unwrap();
    assert!(related > unrelated, "{related} <= {unrelated}");
    assert!((0.0..=1.0).contains(&related));
    assert!((0.0..=1.0).contains(&unrelated));
}

#[test]
fn empty_query_scores_zero() {
    let scorer = HashEmbeddingScorer::default();
    let candidate = Candidate::new("a", "Alpha", "KOSPI", &["memory"], None);
    assert_eq!(scorer.score(&extract_features("   "), &candidate).unwrap(), 0.0);
}
