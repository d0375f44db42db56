use proptest::prelude::*;

use peerlab::engine::{Candidate, HashEmbeddingScorer, SemanticScorer, extract_features};

proptest! {
    #[test]
    fn test_hash_embedding_deterministic(text in ".*") {
        let scorer = HashEmbeddingScorer::new(64);
        let first = scorer.embed(text.split_whitespace());
        let second = scorer.embed(text.split_whitespace());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_hash_embedding_length(text in ".*", dim in 1usize..256usize) {
        let scorer = HashEmbeddingScorer::new(dim);
        let embedding = scorer.embed(text.split_whitespace());
        prop_assert_eq!(embedding.len(), dim);
    }

    #[test]
    fn test_hash_score_in_unit_interval(query in "[a-z ]{0,40}", keywords in prop::collection::vec("[a-z]{1,10}", 0..5)) {
        let scorer = HashEmbeddingScorer::new(128);
        let refs: Vec<&str> = keywords.iter().map(String::as_str).collect();
        let candidate = Candidate::new("c", "Candidate", "KOSPI", &refs, None);
        let score = scorer.score(&extract_features(&query), &candidate).unwrap();
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn test_query_len_counts_raw_tokens(words in prop::collection::vec("[a-z]{1,6}", 0..12)) {
        let features = extract_features(&words.join(" "));
        prop_assert_eq!(features.query_len, words.len());
        prop_assert!(features.tokens.len() <= words.len());
    }
}
