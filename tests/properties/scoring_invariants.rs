use proptest::prelude::*;

use peerlab::engine::scorer::combine;
use peerlab::engine::{
    Candidate, PeerEngine, ScaleBand, ScoringOptions, ScoringWeights, TargetProfile,
};

const VOCABULARY: &[&str] = &[
    "semiconductor",
    "memory",
    "dram",
    "battery",
    "platform",
    "auto",
    "bank",
    "brokerage",
    "display",
    "cloud",
];

fn word() -> impl Strategy<Value = &'static str> {
    prop::sample::select(VOCABULARY)
}

fn candidate_strategy() -> impl Strategy<Value = Candidate> {
    (
        "[a-z]{3,8}",
        prop::collection::vec(word(), 0..4),
        prop::option::of(1.0f64..1.0e6),
        prop::sample::select(&["KOSPI", "KOSDAQ"][..]),
    )
        .prop_map(|(id, keywords, scale, market)| {
            Candidate::new(id.clone(), id.to_uppercase(), market, &keywords, scale)
        })
}

fn pool_strategy() -> impl Strategy<Value = Vec<Candidate>> {
    prop::collection::vec(candidate_strategy(), 0..24).prop_map(|mut pool| {
        pool.sort_by(|a, b| a.id.cmp(&b.id));
        pool.dedup_by(|a, b| a.id == b.id);
        pool
    })
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 0..10).prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn similarity_stays_within_cap(
        alpha in 0.0f64..=1.0,
        beta in 0.0f64..=1.0,
        kw in 0.0f64..=1.0,
        sem in 0.0f64..=1.0,
    ) {
        let score = combine(ScoringWeights::new(alpha, beta), kw, sem, 0.99);
        prop_assert!((0.0..=0.99).contains(&score));
    }

    #[test]
    fn similarity_is_monotone_in_each_component(
        alpha in 0.0f64..=1.0,
        beta in 0.0f64..=1.0,
        kw in 0.0f64..=1.0,
        sem in 0.0f64..=1.0,
        bump in 0.0f64..=1.0,
    ) {
        let weights = ScoringWeights::new(alpha, beta);
        let base = combine(weights, kw, sem, 0.99);
        prop_assert!(combine(weights, (kw + bump).min(1.0), sem, 0.99) >= base);
        prop_assert!(combine(weights, kw, (sem + bump).min(1.0), 0.99) >= base);
    }

    #[test]
    fn ranking_respects_top_k_order_and_floor(
        query in query_strategy(),
        pool in pool_strategy(),
        top_k in 0usize..8,
        target_scale in prop::option::of(1.0f64..1.0e6),
    ) {
        let engine = PeerEngine::default();
        let target = TargetProfile::virtual_target("v", query, target_scale);
        let options = ScoringOptions { top_k, ..ScoringOptions::default() };
        let result = engine.score_peers(&target, &pool, &options).unwrap();

        prop_assert!(result.len() <= top_k);
        for (index, peer) in result.peers.iter().enumerate() {
            prop_assert_eq!(peer.rank, index + 1);
            prop_assert!(peer.scored.similarity > 0.1);
            prop_assert!(peer.scored.similarity <= 0.99);
        }
        for pair in result.peers.windows(2) {
            prop_assert!(pair[0].scored.similarity >= pair[1].scored.similarity);
        }
    }

    #[test]
    fn banded_results_stay_inside_the_band(
        query in query_strategy(),
        pool in pool_strategy(),
        target_scale in 1.0f64..1.0e6,
    ) {
        let engine = PeerEngine::default();
        let target = TargetProfile::virtual_target("v", query, Some(target_scale));
        let options = ScoringOptions { top_k: pool.len(), ..ScoringOptions::default() };
        let result = engine.score_peers(&target, &pool, &options).unwrap();
        let (lower, upper) = ScaleBand::default().bounds(target_scale);

        for peer in &result.peers {
            let scale = peer.scored.candidate.scale.unwrap_or(f64::NAN);
            prop_assert!(scale >= lower && scale <= upper);
        }
    }

    #[test]
    fn scoring_is_idempotent(query in query_strategy(), pool in pool_strategy()) {
        let engine = PeerEngine::default();
        let target = TargetProfile::virtual_target("v", query, None);
        let options = ScoringOptions::default();
        let first = engine.score_peers(&target, &pool, &options).unwrap();
        let second = engine.score_peers(&target, &pool, &options).unwrap();
        prop_assert_eq!(first, second);
    }
}
