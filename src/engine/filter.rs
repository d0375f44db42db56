//! Admission rules applied after scoring
//!
//! Ranking and exclusion diagnostics both go through [`CandidateFilter::admit`]
//! so a candidate is never ranked and explained by different thresholds.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::types::{Candidate, MarketFilter, ScaleBand, ScoredCandidate};

/// Candidates at or below this similarity are never surfaced.
pub const DEFAULT_RELEVANCE_FLOOR: f64 = 0.1;

/// Outcome of the scale band check for a single candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScaleCheck {
    /// Target has no usable scale metric; the band is not applied.
    Unbounded,
    InBand { lower: f64, upper: f64 },
    OutOfBand { lower: f64, upper: f64 },
}

impl ScaleCheck {
    #[must_use]
    pub const fn passes(&self) -> bool {
        !matches!(self, Self::OutOfBand { .. })
    }
}

/// Check `candidate_scale` against `band` around `target_scale`.
///
/// A target without a positive scale disables the band. When the band is
/// active, a candidate without a scale value cannot be placed in it and is
/// treated as out of band.
#[must_use]
pub fn check_scale(
    target_scale: Option<f64>,
    candidate_scale: Option<f64>,
    band: &ScaleBand,
) -> ScaleCheck {
    let Some(target) = target_scale.filter(|value| value.is_finite() && *value > 0.0) else {
        return ScaleCheck::Unbounded;
    };
    let (lower, upper) = band.bounds(target);
    match candidate_scale {
        Some(value) if value >= lower && value <= upper => ScaleCheck::InBand { lower, upper },
        _ => ScaleCheck::OutOfBand { lower, upper },
    }
}

/// Why a scored candidate was not admitted.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    Scale { lower: f64, upper: f64 },
    Market { expected: MarketFilter },
    Relevance { score: f64, floor: f64 },
}

/// Scale band, market segment and relevance floor, applied in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFilter {
    pub band: ScaleBand,
    pub market: MarketFilter,
    pub relevance_floor: f64,
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self {
            band: ScaleBand::default(),
            market: MarketFilter::All,
            relevance_floor: DEFAULT_RELEVANCE_FLOOR,
        }
    }
}

impl CandidateFilter {
    #[must_use]
    pub fn new(band: ScaleBand, market: MarketFilter, relevance_floor: f64) -> Self {
        Self {
            band,
            market,
            relevance_floor,
        }
    }

    /// Scale and market checks; these do not depend on the similarity score.
    pub fn admit_profile(
        &self,
        target_scale: Option<f64>,
        candidate: &Candidate,
    ) -> Result<(), Rejection> {
        if let ScaleCheck::OutOfBand { lower, upper } =
            check_scale(target_scale, candidate.scale, &self.band)
        {
            return Err(Rejection::Scale { lower, upper });
        }
        if !self.market.admits(&candidate.market) {
            return Err(Rejection::Market {
                expected: self.market.clone(),
            });
        }
        Ok(())
    }

    /// Full admission check for a scored candidate.
    pub fn admit(
        &self,
        target_scale: Option<f64>,
        scored: &ScoredCandidate,
    ) -> Result<(), Rejection> {
        self.admit_profile(target_scale, &scored.candidate)?;
        if scored.similarity <= self.relevance_floor {
            return Err(Rejection::Relevance {
                score: scored.similarity,
                floor: self.relevance_floor,
            });
        }
        Ok(())
    }

    /// Keep admitted candidates, preserving input order.
    #[must_use]
    pub fn apply(
        &self,
        target_scale: Option<f64>,
        scored: Vec<ScoredCandidate>,
    ) -> Vec<ScoredCandidate> {
        let before = scored.len();
        let kept: Vec<ScoredCandidate> = scored
            .into_iter()
            .filter(|candidate| self.admit(target_scale, candidate).is_ok())
            .collect();
        debug!(
            target: "filter",
            before,
            after = kept.len(),
            band = %self.band,
            market = %self.market,
            "applied candidate filter"
        );
        kept
    }
}
