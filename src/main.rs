//! peerlab - comparable-company peer matching CLI
//!
//! Rank, diagnose and evaluate peers for listed or virtual targets.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use peerlab::Result;
use peerlab::app::AppContext;
use peerlab::cli::Cli;
use peerlab::cli::output::robot_error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.robot {
                // Robot mode: JSON error output to stdout
                let response = robot_error(e.code(), e.to_string());
                println!("{}", serde_json::to_string(&response).unwrap_or_default());
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let ctx = AppContext::from_cli(cli)?;
    peerlab::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,peerlab=info",
        1 => "info,peerlab=debug,engine=debug,filter=debug",
        2 => "debug,peerlab=trace,scoring=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_env("PEERLAB_LOG")
        .unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.robot {
        // JSON logging for robot mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
