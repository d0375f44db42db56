//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use std::path::PathBuf;

use clap::{Args, Subcommand};

pub mod config;
pub mod diagnose;
pub mod evaluate;
pub mod golden;
pub mod peers;
pub mod tune;

use crate::app::AppContext;
use crate::engine::{
    MarketFilter, ScaleBand, ScoringOptions, ScoringWeights, TargetProfile, TuningParams,
    extract_features,
};
use crate::error::{LabError, Result};
use crate::universe::StaticUniverse;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank peers for a listed or virtual target
    Peers(peers::PeersArgs),

    /// Explain why a candidate was or was not included
    Diagnose(diagnose::DiagnoseArgs),

    /// Grade a peer run against a golden set
    Evaluate(evaluate::EvaluateArgs),

    /// Sweep tuning parameters against a golden set
    Tune(tune::TuneArgs),

    /// Inspect golden peer sets
    Golden(golden::GoldenArgs),

    /// Show or edit configuration
    Config(config::ConfigArgs),
}

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Peers(args) => peers::run(ctx, args),
        Commands::Diagnose(args) => diagnose::run(ctx, args),
        Commands::Evaluate(args) => evaluate::run(ctx, args),
        Commands::Tune(args) => tune::run(ctx, args),
        Commands::Golden(args) => golden::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
    }
}

/// Target selection shared by the scoring commands.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Listed target: identifier, stock code or name from the universe
    #[arg(long, conflicts_with = "describe")]
    pub target: Option<String>,

    /// Virtual target: free-text business description
    #[arg(long)]
    pub describe: Option<String>,

    /// Display name for a virtual target
    #[arg(long, default_value = "Virtual target")]
    pub name: String,

    /// Virtual target revenue, the scale metric for banding
    #[arg(long)]
    pub revenue: Option<f64>,

    /// Candidate universe file (defaults to [data].universe_path)
    #[arg(long)]
    pub universe: Option<PathBuf>,
}

impl TargetArgs {
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.target.is_some() || self.describe.is_some()
    }

    /// Resolve the target against the universe; `None` when neither
    /// `--target` nor `--describe` was given.
    pub fn resolve(&self, universe: &StaticUniverse) -> Result<Option<TargetProfile>> {
        if let Some(needle) = &self.target {
            return universe.listed_target(needle).map(Some);
        }
        Ok(self.describe.as_ref().map(|description| {
            TargetProfile::virtual_target(self.name.clone(), description.clone(), self.revenue)
        }))
    }

    pub fn require(&self, universe: &StaticUniverse) -> Result<TargetProfile> {
        self.resolve(universe)?.ok_or_else(|| {
            LabError::ValidationFailed("missing target (use --target or --describe)".to_string())
        })
    }
}

/// Per-run overrides of the configured scoring knobs.
#[derive(Args, Debug, Clone, Default)]
pub struct TuningArgs {
    /// Keyword weight, clamped into [0, 1]
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Semantic weight, clamped into [0, 1]
    #[arg(long)]
    pub beta: Option<f64>,

    /// Lower scale band multiplier
    #[arg(long)]
    pub band_low: Option<f64>,

    /// Upper scale band multiplier
    #[arg(long)]
    pub band_high: Option<f64>,

    /// Market segment (ALL, KOSPI, KOSDAQ, ...)
    #[arg(long)]
    pub market: Option<String>,

    /// Number of peers to return
    #[arg(long, short = 'k')]
    pub top_k: Option<usize>,
}

impl TuningArgs {
    /// Configured options with these overrides applied.
    pub fn options(&self, ctx: &AppContext) -> Result<ScoringOptions> {
        self.validate()?;
        let base = ctx.scoring_options();
        let weights = match (self.alpha, self.beta, base.weights) {
            (None, None, weights) => weights,
            (alpha, beta, Some(weights)) => Some(ScoringWeights::new(
                alpha.unwrap_or(weights.alpha),
                beta.unwrap_or(weights.beta),
            )),
            (Some(alpha), Some(beta), None) => Some(ScoringWeights::new(alpha, beta)),
            _ => {
                return Err(LabError::ValidationFailed(
                    "--alpha and --beta must be given together".to_string(),
                ));
            }
        };
        let band = ScaleBand::new(
            self.band_low.unwrap_or(base.band.low),
            self.band_high.unwrap_or(base.band.high),
        );
        if band.low > band.high {
            return Err(LabError::ValidationFailed(format!(
                "scale band low {} is above high {}",
                band.low, band.high
            )));
        }
        Ok(ScoringOptions {
            weights,
            band,
            market: self
                .market
                .as_deref()
                .map_or(base.market, MarketFilter::from),
            top_k: self.top_k.unwrap_or(base.top_k),
        })
    }

    /// Explicit tuning bundle; unset weights fall back to the query-length
    /// defaults for `target`.
    pub fn params(&self, ctx: &AppContext, target: &TargetProfile) -> Result<TuningParams> {
        let options = self.options(ctx)?;
        let weights = options.weights.unwrap_or_else(|| {
            ScoringWeights::for_query_len(extract_features(&target.description).query_len)
        });
        Ok(TuningParams {
            alpha: weights.alpha,
            beta: weights.beta,
            band_low: options.band.low,
            band_high: options.band.high,
            market: options.market,
            top_k: options.top_k,
        })
    }

    fn validate(&self) -> Result<()> {
        for (flag, value) in [("--band-low", self.band_low), ("--band-high", self.band_high)] {
            if let Some(value) = value {
                if !(value.is_finite() && value >= 0.0) {
                    return Err(LabError::ValidationFailed(format!(
                        "{flag} must be a non-negative number, got {value}"
                    )));
                }
            }
        }
        Ok(())
    }
}
