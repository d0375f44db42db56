use clap::Parser;

use peerlab::cli::commands::golden::GoldenCommand;
use peerlab::cli::{Cli, Commands, OutputFormat};

fn parse(args: &[&str]) -> Commands {
    let mut argv = vec!["peerlab"];
    argv.extend_from_slice(args);
    Cli::parse_from(argv).command
}

#[test]
fn parse_peers_virtual_target() {
    match parse(&[
        "peers",
        "--describe",
        "memory semiconductor equipment",
        "--name",
        "Fab",
        "--revenue",
        "1000000",
        "-k",
        "3",
        "--market",
        "kosdaq",
        "--explain",
    ]) {
        Commands::Peers(args) => {
            assert_eq!(
                args.target.describe.as_deref(),
                Some("memory semiconductor equipment")
            );
            assert_eq!(args.target.name, "Fab");
            assert_eq!(args.target.revenue, Some(1_000_000.0));
            assert_eq!(args.tuning.top_k, Some(3));
            assert_eq!(args.tuning.market.as_deref(), Some("kosdaq"));
            assert!(args.explain);
            assert!(args.target.target.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_peers_rejects_target_and_describe_together() {
    let result = Cli::try_parse_from([
        "peerlab",
        "peers",
        "--target",
        "005930",
        "--describe",
        "memory",
    ]);
    assert!(result.is_err());
}

#[test]
fn parse_diagnose_with_weights() {
    match parse(&[
        "diagnose",
        "SK Hynix",
        "--target",
        "005930",
        "--alpha",
        "0.3",
        "--beta",
        "0.7",
        "--band-low",
        "0.25",
    ]) {
        Commands::Diagnose(args) => {
            assert_eq!(args.candidate, "SK Hynix");
            assert_eq!(args.target.target.as_deref(), Some("005930"));
            assert_eq!(args.tuning.alpha, Some(0.3));
            assert_eq!(args.tuning.beta, Some(0.7));
            assert_eq!(args.tuning.band_low, Some(0.25));
            assert_eq!(args.tuning.band_high, None);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_evaluate_requires_golden() {
    assert!(Cli::try_parse_from(["peerlab", "evaluate"]).is_err());
    match parse(&["evaluate", "--golden", "samsung-core"]) {
        Commands::Evaluate(args) => {
            assert_eq!(args.golden, "samsung-core");
            assert!(args.golden_file.is_none());
            assert!(!args.target.is_set());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_tune_grid_lists() {
    match parse(&[
        "tune",
        "--golden",
        "g",
        "--alphas",
        "0.1,0.9",
        "--bands",
        "0.5:2,0.1:10",
        "--top-ks",
        "3,5",
    ]) {
        Commands::Tune(args) => {
            assert_eq!(args.alphas, vec![0.1, 0.9]);
            assert_eq!(args.betas, vec![0.2, 0.5, 0.8]);
            assert_eq!(args.top_ks, vec![3, 5]);
            let grid = args.grid().expect("valid grid");
            assert_eq!(grid.bands.len(), 2);
            assert_eq!(grid.len(), 2 * 3 * 2 * 2);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_golden_show() {
    match parse(&["golden", "show", "samsung-core"]) {
        Commands::Golden(args) => match args.command {
            GoldenCommand::Show(show) => assert_eq!(show.id, "samsung-core"),
            other => panic!("unexpected golden command: {other:?}"),
        },
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_config_set_value() {
    match parse(&["config", "filter.band_low", "0.25"]) {
        Commands::Config(args) => {
            assert_eq!(args.key.as_deref(), Some("filter.band_low"));
            assert_eq!(args.value.as_deref(), Some("0.25"));
            assert!(!args.list);
            assert!(!args.unset);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn robot_flag_forces_json() {
    let cli = Cli::parse_from(["peerlab", "--robot", "golden", "list"]);
    assert_eq!(cli.output_format(), OutputFormat::Json);
    let cli = Cli::parse_from(["peerlab", "golden", "list", "--format", "json"]);
    assert_eq!(cli.output_format(), OutputFormat::Json);
    let cli = Cli::parse_from(["peerlab", "-vv", "golden", "list"]);
    assert_eq!(cli.output_format(), OutputFormat::Human);
    assert_eq!(cli.verbose, 2);
}
