//! Peer quality evaluation against analyst golden sets.

pub mod golden;
pub mod metrics;
pub mod tuning;

pub use golden::{
    FileGoldenRepository, GoldenPeer, GoldenPeerSet, GoldenRepository, InMemoryGoldenRepository,
};
pub use metrics::{QualityMetrics, compute_metrics};
pub use tuning::{TuningGrid, TuningOutcome};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{Candidate, PeerEngine, PeerResult, ScoringOptions, TargetProfile, TuningParams};
use crate::error::Result;

/// One evaluation run: the parameters, the ground truth, what the engine
/// returned and how well it matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityEvalResult {
    pub target_label: String,
    pub params: TuningParams,
    pub golden_set: GoldenPeerSet,
    pub result: PeerResult,
    pub metrics: QualityMetrics,
}

impl PeerEngine {
    /// Run `score_peers` with `params` and grade the result against `golden`.
    pub fn evaluate_quality(
        &self,
        target: &TargetProfile,
        candidates: &[Candidate],
        params: &TuningParams,
        golden: &GoldenPeerSet,
    ) -> Result<QualityEvalResult> {
        let options = ScoringOptions::from(params);
        let result = self.score_peers(target, candidates, &options)?;
        let metrics = compute_metrics(&result, golden);

        info!(
            target: "quality",
            golden = %golden.id,
            k = metrics.k,
            hits = metrics.num_hits,
            precision = metrics.precision_at_k,
            recall = metrics.recall_at_k,
            "evaluated peer quality"
        );

        Ok(QualityEvalResult {
            target_label: target.label(),
            params: params.effective(),
            golden_set: golden.clone(),
            result,
            metrics,
        })
    }
}
