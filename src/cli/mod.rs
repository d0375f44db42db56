//! Command-line interface for peerlab

use std::path::PathBuf;

use clap::Parser;

pub mod commands;
pub mod output;

pub use commands::Commands;
pub use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "peerlab",
    version,
    about = "Find, diagnose and evaluate comparable-company peers"
)]
pub struct Cli {
    /// Machine-readable JSON output on stdout, JSON logs on stderr
    #[arg(long, global = true, env = "PEERLAB_ROBOT")]
    pub robot: bool,

    /// Output format
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Explicit config file (skips global and project config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// `--robot` implies JSON regardless of `--format`.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        if self.robot {
            OutputFormat::Json
        } else {
            self.format.unwrap_or_default()
        }
    }
}
