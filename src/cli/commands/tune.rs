//! peerlab tune - Grid search over tuning parameters

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::commands::TargetArgs;
use crate::cli::commands::evaluate::golden_target;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, percent, robot_ok};
use crate::engine::{MarketFilter, ScaleBand};
use crate::error::{LabError, Result};
use crate::quality::{GoldenRepository, TuningGrid};

#[derive(Args, Debug)]
pub struct TuneArgs {
    /// Golden set identifier
    #[arg(long)]
    pub golden: String,

    /// Golden set file (defaults to [data].golden_path)
    #[arg(long)]
    pub golden_file: Option<PathBuf>,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Keyword weights to try
    #[arg(long, value_delimiter = ',', default_values_t = [0.2, 0.5, 0.8])]
    pub alphas: Vec<f64>,

    /// Semantic weights to try
    #[arg(long, value_delimiter = ',', default_values_t = [0.2, 0.5, 0.8])]
    pub betas: Vec<f64>,

    /// Scale bands to try, as LOW:HIGH
    #[arg(long, value_delimiter = ',', default_values = ["0.5:2", "0.25:4"])]
    pub bands: Vec<String>,

    /// Result sizes to try
    #[arg(long, value_delimiter = ',', default_values_t = [5])]
    pub top_ks: Vec<usize>,

    /// Market segment applied to every grid point
    #[arg(long, default_value = "ALL")]
    pub market: String,

    /// Show only the best N outcomes
    #[arg(long, default_value = "10")]
    pub limit: usize,
}

impl TuneArgs {
    pub fn grid(&self) -> Result<TuningGrid> {
        let bands = self
            .bands
            .iter()
            .map(|band| parse_band(band))
            .collect::<Result<Vec<_>>>()?;
        let grid = TuningGrid {
            alphas: self.alphas.clone(),
            betas: self.betas.clone(),
            bands,
            top_ks: self.top_ks.clone(),
            market: MarketFilter::from(self.market.as_str()),
        };
        grid.validate()?;
        Ok(grid)
    }
}

pub fn run(ctx: &AppContext, args: &TuneArgs) -> Result<()> {
    let grid = args.grid()?;
    let golden = ctx
        .golden_repository(args.golden_file.as_deref())?
        .get(&args.golden)?;
    let universe = ctx.universe(args.target.universe.as_deref())?;
    let target = golden_target(&args.target, &universe, &golden)?;

    let mut outcomes = ctx.engine()?.sweep(&target, universe.all(), &golden, &grid)?;
    let evaluated = outcomes.len();
    outcomes.truncate(args.limit);

    if ctx.wants_json() {
        return emit_robot(&robot_ok(serde_json::json!({
            "target_label": target.label(),
            "golden_set": golden.id,
            "evaluated": evaluated,
            "outcomes": outcomes,
        })));
    }

    let mut layout = HumanLayout::new();
    layout
        .title(&format!("Tuning for {}", target.label()))
        .kv("Golden set", &golden.id)
        .kv("Grid points", &evaluated.to_string())
        .blank();
    for (position, outcome) in outcomes.iter().enumerate() {
        let params = &outcome.params;
        layout.push_line(format!(
            "{:>2}. recall {} precision {}  alpha {} beta {} band {}x-{}x top {}",
            position + 1,
            percent(outcome.metrics.recall_at_k),
            percent(outcome.metrics.precision_at_k),
            params.alpha,
            params.beta,
            params.band_low,
            params.band_high,
            params.top_k
        ));
    }
    emit_human(layout);
    Ok(())
}

fn parse_band(raw: &str) -> Result<ScaleBand> {
    let invalid = || LabError::ValidationFailed(format!("invalid band {raw} (expected LOW:HIGH)"));
    let (low, high) = raw.split_once(':').ok_or_else(invalid)?;
    let low = low.trim().parse::<f64>().map_err(|_| invalid())?;
    let high = high.trim().parse::<f64>().map_err(|_| invalid())?;
    Ok(ScaleBand::new(low, high))
}
