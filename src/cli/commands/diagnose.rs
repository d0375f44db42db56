//! peerlab diagnose - Why was a candidate excluded?

use clap::Args;

use crate::app::AppContext;
use crate::cli::commands::{TargetArgs, TuningArgs};
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok, score};
use crate::engine::{ExclusionReason, ExclusionResult, InclusionStatus};
use crate::engine::explain::format_amount;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct DiagnoseArgs {
    /// Candidate identifier, stock code or name
    pub candidate: String,

    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

pub fn run(ctx: &AppContext, args: &DiagnoseArgs) -> Result<()> {
    let universe = ctx.universe(args.target.universe.as_deref())?;
    let target = args.target.require(&universe)?;
    let options = args.tuning.options(ctx)?;
    let engine = ctx.engine()?;

    let diagnosis = engine.diagnose_exclusion(&target, &args.candidate, universe.all(), &options)?;

    if ctx.wants_json() {
        return emit_robot(&robot_ok(&diagnosis));
    }

    let mut layout = HumanLayout::new();
    layout
        .title(&format!("Diagnosis for {}", target.label()))
        .kv("Candidate", &diagnosis.candidate_name)
        .kv(
            "Status",
            match diagnosis.status {
                InclusionStatus::Included => "INCLUDED",
                InclusionStatus::Excluded => "EXCLUDED",
            },
        );
    if let Some(similarity) = diagnosis.similarity {
        layout.kv("Similarity", &score(similarity));
    }
    if let Some(rank) = diagnosis.rank {
        layout.kv("Rank", &rank_note(rank, options.top_k));
    }
    if let Some(reason) = &diagnosis.reason {
        layout.kv("Reason", reason.code()).blank().push_line(describe(&diagnosis, reason));
    }
    emit_human(layout);
    Ok(())
}

fn rank_note(rank: usize, top_k: usize) -> String {
    if rank > top_k {
        format!("{rank} (beyond top {top_k})")
    } else {
        rank.to_string()
    }
}

fn describe(diagnosis: &ExclusionResult, reason: &ExclusionReason) -> String {
    match reason {
        ExclusionReason::TargetItself => {
            "This is the target company; it is never ranked as its own peer.".to_string()
        }
        ExclusionReason::DataParsingError { message } => {
            format!("Financial data for this company could not be parsed: {message}")
        }
        ExclusionReason::ScaleMismatch {
            metric_name,
            target_value,
            candidate_value,
            band,
            lower_bound,
            upper_bound,
        } => format!(
            "{metric_name} of {} is outside {} to {} ({band}; target {}).",
            candidate_value.map_or_else(|| "n/a".to_string(), format_amount),
            format_amount(*lower_bound),
            format_amount(*upper_bound),
            format_amount(*target_value),
        ),
        ExclusionReason::MarketMismatch { expected, actual } => {
            format!("Listed on {actual}, but the run is restricted to {expected}.")
        }
        ExclusionReason::LowSimilarity { score, threshold } => format!(
            "Similarity {score:.3} does not exceed the relevance floor {threshold:.3}."
        ),
        ExclusionReason::NotFound => {
            format!("{} is not in the candidate universe.", diagnosis.query)
        }
    }
}
