//! Ranking quality metrics against a golden set.

use serde::{Deserialize, Serialize};

use crate::engine::types::PeerResult;
use crate::quality::golden::GoldenPeerSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub k: usize,
    pub precision_at_k: f64,
    pub recall_at_k: f64,
    /// At least one golden peer in the top K.
    pub hit_at_k: bool,
    pub num_golden: usize,
    pub num_hits: usize,
}

impl QualityMetrics {
    #[must_use]
    pub const fn zero(k: usize, num_golden: usize) -> Self {
        Self {
            k,
            precision_at_k: 0.0,
            recall_at_k: 0.0,
            hit_at_k: false,
            num_golden,
            num_hits: 0,
        }
    }
}

/// precision@K, recall@K and hit@K with `k = result.top_k`.
///
/// Precision divides by `k`, not by the number of returned peers, so a
/// short result list is penalized. Zero denominators yield 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_metrics(result: &PeerResult, golden: &GoldenPeerSet) -> QualityMetrics {
    let golden_ids = golden.identifiers();
    let k = result.top_k;
    let num_golden = golden_ids.len();

    let num_hits = result
        .peers
        .iter()
        .take(k)
        .filter(|peer| golden_ids.contains(peer.id()))
        .count();

    let precision_at_k = if k > 0 {
        num_hits as f64 / k as f64
    } else {
        0.0
    };
    let recall_at_k = if num_golden > 0 {
        num_hits as f64 / num_golden as f64
    } else {
        0.0
    };

    QualityMetrics {
        k,
        precision_at_k,
        recall_at_k,
        hit_at_k: num_hits > 0,
        num_golden,
        num_hits,
    }
}
