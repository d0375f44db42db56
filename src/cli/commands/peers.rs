//! peerlab peers - Rank peers for a target

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::commands::{TargetArgs, TuningArgs};
use crate::cli::output::{HumanLayout, emit_human, emit_robot, percent, robot_ok, score};
use crate::engine::{PeerExplanation, PeerResult, TargetProfile, explain_peers};
use crate::engine::explain::format_amount;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct PeersArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub tuning: TuningArgs,

    /// Attach a rationale to every peer
    #[arg(long)]
    pub explain: bool,
}

#[derive(Serialize)]
struct PeersOutput<'a> {
    target: &'a TargetProfile,
    target_label: String,
    semantic_backend: &'a str,
    result: &'a PeerResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanations: Option<Vec<PeerExplanation>>,
}

pub fn run(ctx: &AppContext, args: &PeersArgs) -> Result<()> {
    let universe = ctx.universe(args.target.universe.as_deref())?;
    let target = args.target.require(&universe)?;
    let options = args.tuning.options(ctx)?;
    let engine = ctx.engine()?;

    let result = engine.score_peers(&target, universe.all(), &options)?;
    let explanations = args.explain.then(|| explain_peers(&target, &result));

    if ctx.wants_json() {
        return emit_robot(&robot_ok(PeersOutput {
            target: &target,
            target_label: target.label(),
            semantic_backend: engine.semantic_backend(),
            result: &result,
            explanations,
        }));
    }

    let mut layout = HumanLayout::new();
    layout
        .title(&format!("Peers for {}", target.label()))
        .kv(
            "Weights",
            &format!("alpha {} / beta {}", result.weights.alpha, result.weights.beta),
        )
        .kv("Scale band", &result.band.to_string())
        .kv(
            "Target revenue",
            &target
                .band_scale()
                .map_or_else(|| "n/a (band off)".to_string(), format_amount),
        )
        .kv("Market", &options.market.to_string())
        .kv("Backend", engine.semantic_backend())
        .blank();

    if result.is_empty() {
        layout.push_line("No peers passed the filters.");
    }
    for peer in &result.peers {
        let candidate = &peer.scored.candidate;
        layout.push_line(format!(
            "{:>2}. {} ({}, {})  similarity {}  keyword {}  semantic {}",
            peer.rank,
            candidate.name,
            candidate.id,
            candidate.market,
            percent(peer.scored.similarity),
            score(peer.scored.keyword_score),
            score(peer.scored.semantic_score),
        ));
    }
    if let Some(explanations) = &explanations {
        layout.blank().section("Rationale");
        for explanation in explanations {
            layout.bullet(&explanation.summary);
        }
    }
    emit_human(layout);
    Ok(())
}
