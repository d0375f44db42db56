//! Top-K ranking

use crate::engine::types::{RankedPeer, ScoredCandidate};

/// Sort by similarity descending and keep the first `top_k`.
///
/// The sort is stable, so equal similarities keep their input order.
#[must_use]
pub fn rank(mut scored: Vec<ScoredCandidate>, top_k: usize) -> Vec<RankedPeer> {
    scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    scored
        .into_iter()
        .take(top_k)
        .enumerate()
        .map(|(index, scored)| RankedPeer {
            rank: index + 1,
            scored,
        })
        .collect()
}
