//! Parameter sweep over a grid of tuning bundles.
//!
//! Every grid point is evaluated against the same golden set in parallel.
//! Results come back best-first: recall descending, then precision
//! descending, with ties kept in grid order.

use itertools::iproduct;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{Candidate, MarketFilter, PeerEngine, ScaleBand, TargetProfile, TuningParams};
use crate::error::{LabError, Result};
use crate::quality::golden::GoldenPeerSet;
use crate::quality::metrics::QualityMetrics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningGrid {
    pub alphas: Vec<f64>,
    pub betas: Vec<f64>,
    pub bands: Vec<ScaleBand>,
    pub top_ks: Vec<usize>,
    #[serde(default)]
    pub market: MarketFilter,
}

impl Default for TuningGrid {
    fn default() -> Self {
        Self {
            alphas: vec![0.2, 0.5, 0.8],
            betas: vec![0.2, 0.5, 0.8],
            bands: vec![ScaleBand::new(0.5, 2.0), ScaleBand::new(0.25, 4.0)],
            top_ks: vec![5],
            market: MarketFilter::All,
        }
    }
}

impl TuningGrid {
    /// Grid points in row-major order: alpha, beta, band, top_k.
    #[must_use]
    pub fn params(&self) -> Vec<TuningParams> {
        iproduct!(&self.alphas, &self.betas, &self.bands, &self.top_ks)
            .map(|(&alpha, &beta, band, &top_k)| TuningParams {
                alpha,
                beta,
                band_low: band.low,
                band_high: band.high,
                market: self.market.clone(),
                top_k,
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.alphas.len() * self.betas.len() * self.bands.len() * self.top_ks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(LabError::ValidationFailed(
                "tuning grid has an empty axis".to_string(),
            ));
        }
        if let Some(band) = self.bands.iter().find(|band| band.low.is_nan() || band.high.is_nan() || band.low > band.high) {
            return Err(LabError::ValidationFailed(format!(
                "scale band {band} has low above high"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningOutcome {
    pub params: TuningParams,
    pub metrics: QualityMetrics,
}

impl PeerEngine {
    /// Evaluate every grid point and return outcomes best-first.
    pub fn sweep(
        &self,
        target: &TargetProfile,
        candidates: &[Candidate],
        golden: &GoldenPeerSet,
        grid: &TuningGrid,
    ) -> Result<Vec<TuningOutcome>> {
        grid.validate()?;

        let mut outcomes = grid
            .params()
            .into_par_iter()
            .map(|params| {
                let eval = self.evaluate_quality(target, candidates, &params, golden)?;
                Ok(TuningOutcome {
                    params: eval.params,
                    metrics: eval.metrics,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        outcomes.sort_by(|a, b| {
            b.metrics
                .recall_at_k
                .total_cmp(&a.metrics.recall_at_k)
                .then_with(|| b.metrics.precision_at_k.total_cmp(&a.metrics.precision_at_k))
        });

        if let Some(best) = outcomes.first() {
            info!(
                target: "tuning",
                points = outcomes.len(),
                alpha = best.params.alpha,
                beta = best.params.beta,
                recall = best.metrics.recall_at_k,
                precision = best.metrics.precision_at_k,
                "sweep complete"
            );
        }
        Ok(outcomes)
    }
}
