//! peerlab evaluate - Grade a peer run against a golden set

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::commands::{TargetArgs, TuningArgs};
use crate::cli::output::{HumanLayout, emit_human, emit_robot, percent, robot_ok};
use crate::engine::TargetProfile;
use crate::error::{LabError, Result};
use crate::quality::{GoldenPeerSet, GoldenRepository};
use crate::universe::StaticUniverse;

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Golden set identifier
    #[arg(long)]
    pub golden: String,

    /// Golden set file (defaults to [data].golden_path)
    #[arg(long)]
    pub golden_file: Option<PathBuf>,

    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

pub fn run(ctx: &AppContext, args: &EvaluateArgs) -> Result<()> {
    let golden = ctx
        .golden_repository(args.golden_file.as_deref())?
        .get(&args.golden)?;
    let universe = ctx.universe(args.target.universe.as_deref())?;
    let target = golden_target(&args.target, &universe, &golden)?;
    let params = args.tuning.params(ctx, &target)?;

    let eval = ctx
        .engine()?
        .evaluate_quality(&target, universe.all(), &params, &golden)?;

    if ctx.wants_json() {
        return emit_robot(&robot_ok(&eval));
    }

    let metrics = &eval.metrics;
    let golden_ids = golden.identifiers();
    let mut layout = HumanLayout::new();
    layout
        .title(&format!("Quality for {}", eval.target_label))
        .kv("Golden set", &golden.id)
        .kv(
            "Params",
            &format!(
                "alpha {} beta {} band {}x-{}x market {} top {}",
                params.alpha,
                params.beta,
                params.band_low,
                params.band_high,
                params.market,
                params.top_k
            ),
        )
        .kv(&format!("Precision@{}", metrics.k), &percent(metrics.precision_at_k))
        .kv(&format!("Recall@{}", metrics.k), &percent(metrics.recall_at_k))
        .kv(
            &format!("Hit@{}", metrics.k),
            if metrics.hit_at_k { "yes" } else { "no" },
        )
        .kv(
            "Hits",
            &format!("{} of {}", metrics.num_hits, metrics.num_golden),
        )
        .blank()
        .section("Returned peers");
    for peer in &eval.result.peers {
        let marker = if golden_ids.contains(peer.id()) { "*" } else { " " };
        layout.push_line(format!(
            "{marker} {:>2}. {} ({})",
            peer.rank,
            peer.scored.candidate.name,
            peer.id()
        ));
    }
    emit_human(layout);
    Ok(())
}

/// Target from the flags, or the listed company the golden set was curated for.
pub(crate) fn golden_target(
    args: &TargetArgs,
    universe: &StaticUniverse,
    golden: &GoldenPeerSet,
) -> Result<TargetProfile> {
    if let Some(target) = args.resolve(universe)? {
        return Ok(target);
    }
    match &golden.target_id {
        Some(id) => universe.listed_target(id),
        None => Err(LabError::ValidationFailed(format!(
            "golden set {} targets a virtual company; pass --describe",
            golden.id
        ))),
    }
}
