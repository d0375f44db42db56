use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::{
    DEFAULT_RELEVANCE_FLOOR, DEFAULT_SIMILARITY_CAP, MarketFilter, ScaleBand, ScoringOptions,
    ScoringWeights, types::DEFAULT_TOP_K,
};
use crate::error::{LabError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub semantic: SemanticConfig,
    #[serde(default)]
    pub data: DataConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("PEERLAB_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Defaults with a single TOML document merged on top, validated.
    /// Environment overrides are not applied.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let patch: ConfigPatch =
            toml::from_str(raw).map_err(|err| LabError::Config(format!("parse config: {err}")))?;
        let mut config = Self::default();
        config.merge_patch(patch);
        config.validate()?;
        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let path = dirs::config_dir()
            .ok_or_else(|| LabError::MissingConfig("config directory not found".to_string()))?
            .join("peerlab/config.toml");
        Self::load_patch(&path)
    }

    fn load_project(root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&root.join("config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| LabError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| LabError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.scoring {
            self.scoring.merge(patch);
        }
        if let Some(patch) = patch.filter {
            self.filter.merge(patch);
        }
        if let Some(patch) = patch.ranking {
            self.ranking.merge(patch);
        }
        if let Some(patch) = patch.semantic {
            self.semantic.merge(patch);
        }
        if let Some(patch) = patch.data {
            self.data.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_f64("PEERLAB_SCORING_ALPHA")? {
            self.scoring.alpha = Some(value);
        }
        if let Some(value) = env_f64("PEERLAB_SCORING_BETA")? {
            self.scoring.beta = Some(value);
        }
        if let Some(value) = env_f64("PEERLAB_SCORING_SIMILARITY_CAP")? {
            self.scoring.similarity_cap = value;
        }
        if let Some(value) = env_f64("PEERLAB_FILTER_BAND_LOW")? {
            self.filter.band_low = value;
        }
        if let Some(value) = env_f64("PEERLAB_FILTER_BAND_HIGH")? {
            self.filter.band_high = value;
        }
        if let Some(value) = env_f64("PEERLAB_FILTER_RELEVANCE_FLOOR")? {
            self.filter.relevance_floor = value;
        }
        if let Some(value) = env_string("PEERLAB_FILTER_MARKET") {
            self.filter.market = value;
        }
        if let Some(value) = env_u32("PEERLAB_RANKING_TOP_K")? {
            self.ranking.top_k = value;
        }
        if let Some(value) = env_string("PEERLAB_SEMANTIC_BACKEND") {
            self.semantic.backend = value;
        }
        if let Some(value) = env_u32("PEERLAB_SEMANTIC_EMBEDDING_DIMS")? {
            self.semantic.embedding_dims = value;
        }
        if let Some(value) = env_string("PEERLAB_DATA_UNIVERSE_PATH") {
            self.data.universe_path = value;
        }
        if let Some(value) = env_string("PEERLAB_DATA_GOLDEN_PATH") {
            self.data.golden_path = value;
        }
        Ok(())
    }

    /// Reject values the engine cannot use. Weights, cap and floor must lie
    /// in `[0, 1]`; the band must be ordered.
    pub fn validate(&self) -> Result<()> {
        let unit = [
            ("scoring.alpha", self.scoring.alpha),
            ("scoring.beta", self.scoring.beta),
            ("scoring.similarity_cap", Some(self.scoring.similarity_cap)),
            ("filter.relevance_floor", Some(self.filter.relevance_floor)),
        ];
        for (key, value) in unit {
            if let Some(value) = value {
                if !(0.0..=1.0).contains(&value) {
                    return Err(LabError::Config(format!(
                        "{key} must be within [0, 1], got {value}"
                    )));
                }
            }
        }
        if !(self.filter.band_low >= 0.0 && self.filter.band_low <= self.filter.band_high) {
            return Err(LabError::Config(format!(
                "filter band {}..{} must satisfy 0 <= low <= high",
                self.filter.band_low, self.filter.band_high
            )));
        }
        if self.semantic.embedding_dims == 0 {
            return Err(LabError::Config(
                "semantic.embedding_dims must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Per-run scoring options derived from this configuration.
    #[must_use]
    pub fn scoring_options(&self) -> ScoringOptions {
        ScoringOptions {
            weights: self.scoring.weights(),
            band: ScaleBand::new(self.filter.band_low, self.filter.band_high),
            market: MarketFilter::from(self.filter.market.as_str()),
            top_k: self.ranking.top_k as usize,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Explicit keyword weight; unset selects defaults by query length.
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub similarity_cap: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            alpha: None,
            beta: None,
            similarity_cap: DEFAULT_SIMILARITY_CAP,
        }
    }
}

impl ScoringConfig {
    fn merge(&mut self, patch: ScoringPatch) {
        if let Some(value) = patch.alpha {
            self.alpha = Some(value);
        }
        if let Some(value) = patch.beta {
            self.beta = Some(value);
        }
        if let Some(value) = patch.similarity_cap {
            self.similarity_cap = value;
        }
    }

    /// Explicit weights only when both are configured.
    #[must_use]
    pub fn weights(&self) -> Option<ScoringWeights> {
        self.alpha
            .zip(self.beta)
            .map(|(alpha, beta)| ScoringWeights::new(alpha, beta))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub band_low: f64,
    pub band_high: f64,
    pub relevance_floor: f64,
    pub market: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        let band = ScaleBand::default();
        Self {
            band_low: band.low,
            band_high: band.high,
            relevance_floor: DEFAULT_RELEVANCE_FLOOR,
            market: "ALL".to_string(),
        }
    }
}

impl FilterConfig {
    fn merge(&mut self, patch: FilterPatch) {
        if let Some(value) = patch.band_low {
            self.band_low = value;
        }
        if let Some(value) = patch.band_high {
            self.band_high = value;
        }
        if let Some(value) = patch.relevance_floor {
            self.relevance_floor = value;
        }
        if let Some(value) = patch.market {
            self.market = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub top_k: u32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K as u32,
        }
    }
}

impl RankingConfig {
    fn merge(&mut self, patch: RankingPatch) {
        if let Some(value) = patch.top_k {
            self.top_k = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    /// `heuristic` or `hash`.
    pub backend: String,
    pub embedding_dims: u32,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            backend: "heuristic".to_string(),
            embedding_dims: 256,
        }
    }
}

impl SemanticConfig {
    fn merge(&mut self, patch: SemanticPatch) {
        if let Some(value) = patch.backend {
            self.backend = value;
        }
        if let Some(value) = patch.embedding_dims {
            self.embedding_dims = value;
        }
    }
}

/// Data file locations; relative paths resolve against the peerlab root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub universe_path: String,
    pub golden_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            universe_path: "universe.toml".to_string(),
            golden_path: "golden.toml".to_string(),
        }
    }
}

impl DataConfig {
    fn merge(&mut self, patch: DataPatch) {
        if let Some(value) = patch.universe_path {
            self.universe_path = value;
        }
        if let Some(value) = patch.golden_path {
            self.golden_path = value;
        }
    }

    #[must_use]
    pub fn resolve(root: &Path, value: &str) -> PathBuf {
        let path = PathBuf::from(value);
        if path.is_absolute() {
            path
        } else {
            root.join(path)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub scoring: Option<ScoringPatch>,
    pub filter: Option<FilterPatch>,
    pub ranking: Option<RankingPatch>,
    pub semantic: Option<SemanticPatch>,
    pub data: Option<DataPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ScoringPatch {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub similarity_cap: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FilterPatch {
    pub band_low: Option<f64>,
    pub band_high: Option<f64>,
    pub relevance_floor: Option<f64>,
    pub market: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RankingPatch {
    pub top_k: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SemanticPatch {
    pub backend: Option<String>,
    pub embedding_dims: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DataPatch {
    pub universe_path: Option<String>,
    pub golden_path: Option<String>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_u32(key: &str) -> Result<Option<u32>> {
    match std::env::var(key) {
        Ok(value) => value.parse::<u32>().map(Some).map_err(|err| {
            LabError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}

fn env_f64(key: &str) -> Result<Option<f64>> {
    match std::env::var(key) {
        Ok(value) => value.parse::<f64>().map(Some).map_err(|err| {
            LabError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}
