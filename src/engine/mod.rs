//! Peer matching engine
//!
//! Pure, synchronous pipeline: feature extraction, hybrid scoring, scale and
//! relevance filtering, then stable top-K ranking. Each run works on an
//! immutable snapshot of its inputs, so independent runs can execute in
//! parallel without locking.

use tracing::{debug, info};

pub mod diagnostics;
pub mod explain;
pub mod features;
pub mod filter;
pub mod ranker;
pub mod scorer;
pub mod semantic;
pub mod types;

pub use diagnostics::{ExclusionReason, ExclusionResult, InclusionStatus};
pub use explain::{PeerExplanation, explain_peers};
pub use features::{QueryFeatures, extract_features};
pub use filter::{CandidateFilter, DEFAULT_RELEVANCE_FLOOR};
pub use scorer::{DEFAULT_SIMILARITY_CAP, HybridScorer};
pub use semantic::{
    HashEmbeddingScorer, HeuristicSemanticScorer, PrecomputedSemanticScorer, SemanticScorer,
};
pub use types::{
    Candidate, MarketFilter, PeerResult, RankedPeer, ScaleBand, ScoredCandidate, ScoringOptions,
    ScoringWeights, TargetProfile, TuningParams,
};

use crate::error::Result;
use types::clamp_unit;

/// Scores, filters and ranks candidate pools with one semantic backend.
pub struct PeerEngine {
    semantic: Box<dyn SemanticScorer>,
    similarity_cap: f64,
    relevance_floor: f64,
}

impl Default for PeerEngine {
    fn default() -> Self {
        Self::new(Box::new(HeuristicSemanticScorer))
    }
}

impl PeerEngine {
    pub fn new(semantic: Box<dyn SemanticScorer>) -> Self {
        Self {
            semantic,
            similarity_cap: DEFAULT_SIMILARITY_CAP,
            relevance_floor: DEFAULT_RELEVANCE_FLOOR,
        }
    }

    /// Override the similarity ceiling (clamped into `[0, 1]`).
    #[must_use]
    pub fn with_similarity_cap(mut self, cap: f64) -> Self {
        self.similarity_cap = clamp_unit(cap);
        self
    }

    /// Override the admission floor (clamped into `[0, 1]`).
    #[must_use]
    pub fn with_relevance_floor(mut self, floor: f64) -> Self {
        self.relevance_floor = clamp_unit(floor);
        self
    }

    #[must_use]
    pub fn semantic_backend(&self) -> &str {
        self.semantic.name()
    }

    #[must_use]
    pub const fn similarity_cap(&self) -> f64 {
        self.similarity_cap
    }

    #[must_use]
    pub const fn relevance_floor(&self) -> f64 {
        self.relevance_floor
    }

    /// Why `candidate` can never be ranked for `target`, if it can't.
    #[must_use]
    pub fn ineligibility(target: &TargetProfile, candidate: &Candidate) -> Option<ExclusionReason> {
        if target.id.as_deref() == Some(candidate.id.as_str()) {
            return Some(ExclusionReason::TargetItself);
        }
        candidate
            .extraction_error
            .as_ref()
            .map(|message| ExclusionReason::DataParsingError {
                message: message.clone(),
            })
    }

    pub(crate) fn scorer(&self, options: &ScoringOptions) -> HybridScorer<'_> {
        HybridScorer::new(self.semantic.as_ref())
            .with_weights(options.weights)
            .with_cap(self.similarity_cap)
    }

    pub(crate) fn filter(&self, options: &ScoringOptions) -> CandidateFilter {
        CandidateFilter::new(options.band, options.market.clone(), self.relevance_floor)
    }

    /// Rank peers for `target` out of `candidates`.
    ///
    /// The target itself and candidates whose financial extraction failed
    /// never enter the ranking. `top_k == 0` or an empty pool yields an empty
    /// result; a semantic collaborator failure fails the whole run.
    pub fn score_peers(
        &self,
        target: &TargetProfile,
        candidates: &[Candidate],
        options: &ScoringOptions,
    ) -> Result<PeerResult> {
        let features = extract_features(&target.description);
        let scorer = self.scorer(options);
        let weights = scorer.effective_weights(&features);

        if options.top_k == 0 || candidates.is_empty() {
            debug!(
                target: "engine",
                top_k = options.top_k,
                pool = candidates.len(),
                "nothing to rank"
            );
            return Ok(PeerResult::empty(weights, options.band, options.top_k));
        }

        let pool = candidates
            .iter()
            .filter(|candidate| Self::ineligibility(target, candidate).is_none());
        let scored = scorer.score_all(&features, pool)?;
        let admitted = self.filter(options).apply(target.band_scale(), scored);
        let peers = ranker::rank(admitted, options.top_k);

        info!(
            target: "engine",
            label = %target.label(),
            query_len = features.query_len,
            alpha = weights.alpha,
            beta = weights.beta,
            pool = candidates.len(),
            ranked = peers.len(),
            backend = self.semantic.name(),
            "scored peers"
        );

        Ok(PeerResult {
            peers,
            weights,
            band: options.band,
            top_k: options.top_k,
        })
    }
}
