//! peerlab config - Show or edit configuration

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::config::Config;
use crate::error::{LabError, Result};

/// Keys accepted by `config KEY VALUE`.
pub const KNOWN_KEYS: &[&str] = &[
    "scoring.alpha",
    "scoring.beta",
    "scoring.similarity_cap",
    "filter.band_low",
    "filter.band_high",
    "filter.relevance_floor",
    "filter.market",
    "ranking.top_k",
    "semantic.backend",
    "semantic.embedding_dims",
    "data.universe_path",
    "data.golden_path",
];

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Dotted key, e.g. filter.band_low
    pub key: Option<String>,

    /// New value for KEY (written to the active config file)
    pub value: Option<String>,

    /// Print the effective configuration
    #[arg(long)]
    pub list: bool,

    /// Remove KEY from the config file
    #[arg(long, requires = "key")]
    pub unset: bool,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    match (&args.key, &args.value) {
        (Some(key), Some(value)) => set_value(ctx, key, Some(value)),
        (Some(key), None) if args.unset => set_value(ctx, key, None),
        (Some(key), None) => show_value(ctx, key),
        (None, _) => show_all(ctx),
    }
}

fn show_all(ctx: &AppContext) -> Result<()> {
    if ctx.wants_json() {
        return emit_robot(&robot_ok(serde_json::json!({
            "config_path": ctx.config_path,
            "root": ctx.root,
            "config": ctx.config,
        })));
    }

    let rendered = toml::to_string_pretty(&ctx.config)
        .map_err(|err| LabError::Config(format!("render config: {err}")))?;
    let mut layout = HumanLayout::new();
    layout
        .title("Configuration")
        .kv("Root", &ctx.root.display().to_string())
        .kv("Config file", &ctx.config_path.display().to_string())
        .blank()
        .push_line(rendered);
    emit_human(layout);
    Ok(())
}

fn show_value(ctx: &AppContext, key: &str) -> Result<()> {
    let rendered = toml::Value::try_from(&ctx.config)
        .map_err(|err| LabError::Config(format!("render config: {err}")))?;
    let value = rendered.as_table().and_then(|table| lookup(table, key));
    if value.is_none() && !KNOWN_KEYS.contains(&key) {
        return Err(LabError::Config(format!("unknown config key {key}")));
    }

    if ctx.wants_json() {
        return emit_robot(&robot_ok(serde_json::json!({
            "key": key,
            "value": value,
        })));
    }
    match value {
        Some(toml::Value::String(text)) => println!("{text}"),
        Some(other) => println!("{other}"),
        None => println!("(unset)"),
    }
    Ok(())
}

fn set_value(ctx: &AppContext, key: &str, value: Option<&str>) -> Result<()> {
    if !KNOWN_KEYS.contains(&key) {
        return Err(LabError::Config(format!("unknown config key {key}")));
    }
    let (section, field) = key
        .split_once('.')
        .ok_or_else(|| LabError::Config(format!("invalid config key {key}")))?;

    let path = &ctx.config_path;
    let mut table = if path.exists() {
        std::fs::read_to_string(path)?
            .parse::<toml::Table>()
            .map_err(|err| LabError::Config(format!("parse config {}: {err}", path.display())))?
    } else {
        toml::Table::new()
    };

    let section_table = table
        .entry(section)
        .or_insert(toml::Value::Table(toml::Table::new()))
        .as_table_mut()
        .ok_or_else(|| LabError::Config(format!("[{section}] is not a table")))?;
    match value {
        Some(raw) => {
            section_table.insert(field.to_string(), parse_value(raw));
        }
        None => {
            section_table.remove(field);
        }
    }

    let rendered = toml::to_string_pretty(&table)
        .map_err(|err| LabError::Config(format!("render config: {err}")))?;
    Config::from_toml_str(&rendered)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, rendered)?;
    tracing::info!(target: "config", key, path = %path.display(), "config updated");

    if ctx.wants_json() {
        return emit_robot(&robot_ok(serde_json::json!({
            "key": key,
            "value": value,
            "config_path": path,
        })));
    }
    match value {
        Some(raw) => println!("Set {key} = {raw} in {}", path.display()),
        None => println!("Unset {key} in {}", path.display()),
    }
    Ok(())
}

fn lookup<'t>(table: &'t toml::Table, key: &str) -> Option<&'t toml::Value> {
    let (section, field) = key.split_once('.')?;
    table.get(section)?.as_table()?.get(field)
}

/// Typed TOML value: bool, integer, float, then string.
fn parse_value(raw: &str) -> toml::Value {
    if let Ok(value) = raw.parse::<bool>() {
        toml::Value::Boolean(value)
    } else if let Ok(value) = raw.parse::<i64>() {
        toml::Value::Integer(value)
    } else if let Ok(value) = raw.parse::<f64>() {
        toml::Value::Float(value)
    } else {
        toml::Value::String(raw.to_string())
    }
}
