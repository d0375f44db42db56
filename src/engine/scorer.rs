//! Hybrid keyword + semantic scoring

use tracing::trace;

use crate::engine::features::QueryFeatures;
use crate::engine::semantic::SemanticScorer;
use crate::engine::types::{Candidate, ScoredCandidate, ScoringWeights, clamp_unit};
use crate::error::Result;

/// Similarity ceiling; a perfect 1.0 would read as a spurious exact match.
pub const DEFAULT_SIMILARITY_CAP: f64 = 0.99;

/// Count (keyword, token) pairs where either string contains the other.
#[must_use]
pub fn keyword_match_count(query: &QueryFeatures, keywords: &[String]) -> usize {
    keywords
        .iter()
        .map(|keyword| keyword.trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .map(|keyword| {
            query
                .tokens
                .iter()
                .filter(|token| token.contains(&keyword) || keyword.contains(token.as_str()))
                .count()
        })
        .sum()
}

/// Lexical overlap score in `[0, 1]`.
///
/// Matches are divided by the query length capped at three tokens. Queries
/// of one or two tokens with at least one match are treated as exact intent
/// and score 1.0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn keyword_score(query: &QueryFeatures, keywords: &[String]) -> f64 {
    let matches = keyword_match_count(query, keywords);
    if matches == 0 {
        return 0.0;
    }
    if query.query_len <= 2 {
        return 1.0;
    }
    let denominator = query.query_len.clamp(1, 3);
    (matches as f64 / denominator as f64).min(1.0)
}

/// Weighted sum of the component scores, capped at `cap`.
#[must_use]
pub fn combine(weights: ScoringWeights, keyword: f64, semantic: f64, cap: f64) -> f64 {
    let raw = weights.alpha * keyword + weights.beta * semantic;
    raw.clamp(0.0, cap)
}

/// Scores candidates against one query.
pub struct HybridScorer<'a> {
    semantic: &'a dyn SemanticScorer,
    weights: Option<ScoringWeights>,
    cap: f64,
}

impl<'a> HybridScorer<'a> {
    pub fn new(semantic: &'a dyn SemanticScorer) -> Self {
        Self {
            semantic,
            weights: None,
            cap: DEFAULT_SIMILARITY_CAP,
        }
    }

    /// Explicit weights; `None` keeps query-length defaults.
    #[must_use]
    pub fn with_weights(mut self, weights: Option<ScoringWeights>) -> Self {
        self.weights = weights.map(|w| ScoringWeights::new(w.alpha, w.beta));
        self
    }

    #[must_use]
    pub fn with_cap(mut self, cap: f64) -> Self {
        self.cap = clamp_unit(cap);
        self
    }

    #[must_use]
    pub fn effective_weights(&self, query: &QueryFeatures) -> ScoringWeights {
        self.weights
            .unwrap_or_else(|| ScoringWeights::for_query_len(query.query_len))
    }

    pub fn score(&self, query: &QueryFeatures, candidate: &Candidate) -> Result<ScoredCandidate> {
        let weights = self.effective_weights(query);
        let keyword = keyword_score(query, &candidate.keywords);
        let semantic = clamp_unit(self.semantic.score(query, candidate)?);
        let similarity = combine(weights, keyword, semantic, self.cap);

        trace!(
            target: "scoring",
            candidate = %candidate.id,
            keyword,
            semantic,
            similarity,
            "scored candidate"
        );

        Ok(ScoredCandidate {
            candidate: candidate.clone(),
            keyword_score: keyword,
            semantic_score: semantic,
            similarity,
        })
    }

    /// Score every candidate; the first collaborator failure aborts the run.
    pub fn score_all<'c>(
        &self,
        query: &QueryFeatures,
        candidates: impl IntoIterator<Item = &'c Candidate>,
    ) -> Result<Vec<ScoredCandidate>> {
        candidates
            .into_iter()
            .map(|candidate| self.score(query, candidate))
            .collect()
    }
}
