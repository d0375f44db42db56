//! Exclusion diagnostics: "why wasn't X included?"
//!
//! An ordered decision chain over one named candidate; the first rule that
//! fires wins:
//!
//! 1. `TARGET_ITSELF` - the candidate is the listed target
//! 2. `DATA_PARSING_ERROR` - upstream financial extraction failed
//! 3. `SCALE_MISMATCH` - scale metric outside the band
//! 4. `MARKET_MISMATCH` - segment differs from the requested market
//! 5. `LOW_SIMILARITY` - similarity at or below the relevance floor
//! 6. `NOT_FOUND` - no such candidate in the universe
//!
//! Rules 1-2 share `PeerEngine::ineligibility` with ranking; rules 3-5 call
//! the same scorer and filter.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::features::extract_features;
use crate::engine::filter::Rejection;
use crate::engine::types::{Candidate, ScaleBand, ScoringOptions, TargetProfile};
use crate::engine::PeerEngine;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InclusionStatus {
    Included,
    Excluded,
}

/// Reason code plus the details an analyst needs to act on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason_code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExclusionReason {
    TargetItself,
    DataParsingError {
        message: String,
    },
    ScaleMismatch {
        metric_name: String,
        target_value: f64,
        candidate_value: Option<f64>,
        band: ScaleBand,
        lower_bound: f64,
        upper_bound: f64,
    },
    MarketMismatch {
        expected: String,
        actual: String,
    },
    LowSimilarity {
        score: f64,
        threshold: f64,
    },
    NotFound,
}

impl ExclusionReason {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TargetItself => "TARGET_ITSELF",
            Self::DataParsingError { .. } => "DATA_PARSING_ERROR",
            Self::ScaleMismatch { .. } => "SCALE_MISMATCH",
            Self::MarketMismatch { .. } => "MARKET_MISMATCH",
            Self::LowSimilarity { .. } => "LOW_SIMILARITY",
            Self::NotFound => "NOT_FOUND",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionResult {
    /// Name or identifier the analyst asked about.
    pub query: String,
    #[serde(default)]
    pub candidate_id: Option<String>,
    pub candidate_name: String,
    pub status: InclusionStatus,
    #[serde(default)]
    pub reason: Option<ExclusionReason>,
    /// Similarity when the candidate was scored.
    #[serde(default)]
    pub similarity: Option<f64>,
    /// Position among admitted candidates; above `top_k` means it was cut
    /// by the result size rather than by a rule.
    #[serde(default)]
    pub rank: Option<usize>,
}

impl ExclusionResult {
    fn excluded(query: &str, candidate: Option<&Candidate>, reason: ExclusionReason) -> Self {
        Self {
            query: query.to_string(),
            candidate_id: candidate.map(|c| c.id.clone()),
            candidate_name: candidate.map_or_else(|| query.to_string(), |c| c.name.clone()),
            status: InclusionStatus::Excluded,
            reason: Some(reason),
            similarity: None,
            rank: None,
        }
    }

    #[must_use]
    pub fn reason_code(&self) -> Option<&'static str> {
        self.reason.as_ref().map(ExclusionReason::code)
    }
}

/// Find a candidate by id, stock code or name; falls back to a unique
/// case-insensitive name substring.
#[must_use]
pub fn find_candidate<'c>(candidates: &'c [Candidate], needle: &str) -> Option<&'c Candidate> {
    let needle = needle.trim();
    if needle.is_empty() {
        return None;
    }
    if let Some(found) = candidates.iter().find(|c| c.is_named(needle)) {
        return Some(found);
    }
    let lowered = needle.to_lowercase();
    let mut partial = candidates
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&lowered));
    match (partial.next(), partial.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

impl PeerEngine {
    /// Explain whether `needle` would be included for `target`.
    pub fn diagnose_exclusion(
        &self,
        target: &TargetProfile,
        needle: &str,
        candidates: &[Candidate],
        options: &ScoringOptions,
    ) -> Result<ExclusionResult> {
        let Some(candidate) = find_candidate(candidates, needle) else {
            debug!(target: "diagnostics", needle, "candidate not found");
            return Ok(ExclusionResult::excluded(needle, None, ExclusionReason::NotFound));
        };

        if let Some(reason) = Self::ineligibility(target, candidate) {
            debug!(target: "diagnostics", candidate = %candidate.id, reason = reason.code(), "never ranked");
            return Ok(ExclusionResult::excluded(needle, Some(candidate), reason));
        }

        let features = extract_features(&target.description);
        let scored = self.scorer(options).score(&features, candidate)?;
        let filter = self.filter(options);
        let target_scale = target.band_scale();

        let reason = match filter.admit(target_scale, &scored) {
            Ok(()) => None,
            Err(Rejection::Scale { lower, upper }) => Some(ExclusionReason::ScaleMismatch {
                metric_name: "revenue".to_string(),
                target_value: target_scale.unwrap_or_default(),
                candidate_value: candidate.scale,
                band: options.band,
                lower_bound: lower,
                upper_bound: upper,
            }),
            Err(Rejection::Market { expected }) => Some(ExclusionReason::MarketMismatch {
                expected: expected.to_string(),
                actual: candidate.market.clone(),
            }),
            Err(Rejection::Relevance { score, floor }) => Some(ExclusionReason::LowSimilarity {
                score,
                threshold: floor,
            }),
        };

        let rank = if reason.is_none() {
            self.admitted_rank(target, candidates, options, &candidate.id)?
        } else {
            None
        };

        let result = ExclusionResult {
            query: needle.to_string(),
            candidate_id: Some(candidate.id.clone()),
            candidate_name: candidate.name.clone(),
            status: if reason.is_some() {
                InclusionStatus::Excluded
            } else {
                InclusionStatus::Included
            },
            reason,
            similarity: Some(scored.similarity),
            rank,
        };
        debug!(
            target: "diagnostics",
            candidate = %candidate.id,
            status = ?result.status,
            reason = result.reason_code().unwrap_or("-"),
            "diagnosed candidate"
        );
        Ok(result)
    }

    fn admitted_rank(
        &self,
        target: &TargetProfile,
        candidates: &[Candidate],
        options: &ScoringOptions,
        candidate_id: &str,
    ) -> Result<Option<usize>> {
        let unbounded = ScoringOptions {
            top_k: candidates.len(),
            ..options.clone()
        };
        let result = self.score_peers(target, candidates, &unbounded)?;
        Ok(result
            .peers
            .iter()
            .find(|peer| peer.id() == candidate_id)
            .map(|peer| peer.rank))
    }
}
