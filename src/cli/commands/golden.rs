//! peerlab golden - Inspect golden peer sets

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::error::Result;
use crate::quality::GoldenRepository;

#[derive(Args, Debug)]
pub struct GoldenArgs {
    /// Golden set file (defaults to [data].golden_path)
    #[arg(long, global = true)]
    pub golden_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: GoldenCommand,
}

#[derive(Subcommand, Debug)]
pub enum GoldenCommand {
    /// List golden sets
    List,
    /// Show one golden set
    Show(ShowGoldenArgs),
}

#[derive(Args, Debug)]
pub struct ShowGoldenArgs {
    /// Golden set identifier
    pub id: String,
}

pub fn run(ctx: &AppContext, args: &GoldenArgs) -> Result<()> {
    let repo = ctx.golden_repository(args.golden_file.as_deref())?;
    match &args.command {
        GoldenCommand::List => run_list(ctx, &repo),
        GoldenCommand::Show(show) => run_show(ctx, &repo, &show.id),
    }
}

fn run_list(ctx: &AppContext, repo: &dyn GoldenRepository) -> Result<()> {
    let sets = repo.list()?;
    if ctx.wants_json() {
        return emit_robot(&robot_ok(serde_json::json!({
            "count": sets.len(),
            "sets": sets,
        })));
    }

    let mut layout = HumanLayout::new();
    layout.title("Golden Peer Sets");
    if sets.is_empty() {
        layout.push_line("No golden sets found.");
    }
    for set in &sets {
        layout.kv(
            &set.id,
            &format!("{} ({} peers)", set.target_label, set.peers.len()),
        );
    }
    emit_human(layout);
    Ok(())
}

fn run_show(ctx: &AppContext, repo: &dyn GoldenRepository, id: &str) -> Result<()> {
    let set = repo.get(id)?;
    if ctx.wants_json() {
        return emit_robot(&robot_ok(&set));
    }

    let mut layout = HumanLayout::new();
    layout
        .title(&format!("Golden set {}", set.id))
        .kv("Target", &set.target_label)
        .kv("Target id", set.target_id.as_deref().unwrap_or("virtual"))
        .kv(
            "Created",
            &set.created_at
                .map_or_else(|| "unknown".to_string(), |at| at.to_rfc3339()),
        )
        .blank()
        .section("Peers");
    for peer in &set.peers {
        let label = match (&peer.name, &peer.stock_code) {
            (Some(name), Some(code)) => format!("{} - {name} ({code})", peer.id),
            (Some(name), None) => format!("{} - {name}", peer.id),
            (None, Some(code)) => format!("{} ({code})", peer.id),
            (None, None) => peer.id.clone(),
        };
        layout.bullet(&label);
    }
    emit_human(layout);
    Ok(())
}
