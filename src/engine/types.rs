//! Plain records exchanged between the engine and its collaborators.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Company the analyst wants peers for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetProfile {
    /// Identifier of a listed company; `None` for virtual targets.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    /// Free-text business description used as the scoring query.
    #[serde(default)]
    pub description: String,
    /// Scale metric (revenue by default) driving the scale band.
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub is_virtual: bool,
}

impl TargetProfile {
    /// Hypothetical company described only by text and optional revenue.
    pub fn virtual_target(
        name: impl Into<String>,
        description: impl Into<String>,
        scale: Option<f64>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            scale,
            is_virtual: true,
        }
    }

    pub fn listed(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        scale: Option<f64>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            description: description.into(),
            scale,
            is_virtual: false,
        }
    }

    /// Scale metric usable for banding: present, finite and positive.
    #[must_use]
    pub fn band_scale(&self) -> Option<f64> {
        self.scale.filter(|value| value.is_finite() && *value > 0.0)
    }

    #[must_use]
    pub fn label(&self) -> String {
        if self.is_virtual {
            format!("Virtual - {}", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// A company from the candidate pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    /// Market segment, e.g. `KOSPI` or `KOSDAQ`.
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub stock_code: Option<String>,
    /// Keywords or description fragments matched against query tokens.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub scale: Option<f64>,
    /// Set by the financial data provider when extraction failed.
    #[serde(default)]
    pub extraction_error: Option<String>,
}

impl Candidate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        market: impl Into<String>,
        keywords: &[&str],
        scale: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            market: market.into(),
            stock_code: None,
            keywords: keywords.iter().map(|kw| (*kw).to_string()).collect(),
            scale,
            extraction_error: None,
        }
    }

    /// Whether `needle` names this candidate exactly (id, stock code or name).
    #[must_use]
    pub fn is_named(&self, needle: &str) -> bool {
        let needle = needle.trim();
        self.id == needle
            || self.stock_code.as_deref() == Some(needle)
            || self.name.to_lowercase() == needle.to_lowercase()
    }
}

/// Keyword (`alpha`) and semantic (`beta`) weights.
///
/// Combined as a plain weighted sum, not a normalized average: the weights
/// do not have to add up to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub alpha: f64,
    pub beta: f64,
}

impl ScoringWeights {
    /// Terse queries (two tokens or fewer) favour exact keyword hits.
    pub const TERSE: Self = Self {
        alpha: 0.8,
        beta: 0.2,
    };
    /// Descriptive queries (eight tokens or more) favour semantic matches.
    pub const DESCRIPTIVE: Self = Self {
        alpha: 0.2,
        beta: 0.8,
    };
    pub const BALANCED: Self = Self {
        alpha: 0.5,
        beta: 0.5,
    };

    /// Weights clamped into `[0, 1]`; NaN becomes 0.
    #[must_use]
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self {
            alpha: clamp_unit(alpha),
            beta: clamp_unit(beta),
        }
    }

    /// Default weights chosen from the raw query token count.
    #[must_use]
    pub const fn for_query_len(query_len: usize) -> Self {
        if query_len <= 2 {
            Self::TERSE
        } else if query_len >= 8 {
            Self::DESCRIPTIVE
        } else {
            Self::BALANCED
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::BALANCED
    }
}

/// Multiplicative bounds around the target's scale metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleBand {
    pub low: f64,
    pub high: f64,
}

impl ScaleBand {
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Absolute `[lower, upper]` bounds for a given target scale.
    #[must_use]
    pub fn bounds(&self, target_scale: f64) -> (f64, f64) {
        (target_scale * self.low, target_scale * self.high)
    }
}

impl Default for ScaleBand {
    fn default() -> Self {
        Self {
            low: 0.5,
            high: 2.0,
        }
    }
}

impl fmt::Display for ScaleBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x - {}x of target", self.low, self.high)
    }
}

/// Market segment restriction. `ALL` (or empty) admits every segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MarketFilter {
    #[default]
    All,
    Segment(String),
}

impl MarketFilter {
    #[must_use]
    pub fn admits(&self, market: &str) -> bool {
        match self {
            Self::All => true,
            Self::Segment(segment) => segment.eq_ignore_ascii_case(market),
        }
    }
}

impl From<String> for MarketFilter {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Segment(trimmed.to_uppercase())
        }
    }
}

impl From<&str> for MarketFilter {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<MarketFilter> for String {
    fn from(value: MarketFilter) -> Self {
        match value {
            MarketFilter::All => "ALL".to_string(),
            MarketFilter::Segment(segment) => segment,
        }
    }
}

impl fmt::Display for MarketFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("ALL"),
            Self::Segment(segment) => f.write_str(segment),
        }
    }
}

/// Candidate with its component scores and blended similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub keyword_score: f64,
    pub semantic_score: f64,
    pub similarity: f64,
}

/// A scored candidate tagged with its 1-based rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPeer {
    pub rank: usize,
    #[serde(flatten)]
    pub scored: ScoredCandidate,
}

impl RankedPeer {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.scored.candidate.id
    }
}

/// Per-run knobs for `score_peers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringOptions {
    /// Explicit weights; `None` selects defaults from the query length.
    #[serde(default)]
    pub weights: Option<ScoringWeights>,
    #[serde(default)]
    pub band: ScaleBand,
    #[serde(default)]
    pub market: MarketFilter,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            weights: None,
            band: ScaleBand::default(),
            market: MarketFilter::All,
            top_k: default_top_k(),
        }
    }
}

/// Default result size for virtual targets.
pub const DEFAULT_TOP_K: usize = 5;

const fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// Ranked peers for one run, echoing the parameters that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerResult {
    pub peers: Vec<RankedPeer>,
    pub weights: ScoringWeights,
    pub band: ScaleBand,
    pub top_k: usize,
}

impl PeerResult {
    #[must_use]
    pub fn empty(weights: ScoringWeights, band: ScaleBand, top_k: usize) -> Self {
        Self {
            peers: Vec::new(),
            weights,
            band,
            top_k,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.peers.iter().map(RankedPeer::id)
    }
}

/// Analyst-facing tuning bundle used by evaluation and sweeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningParams {
    pub alpha: f64,
    pub beta: f64,
    pub band_low: f64,
    pub band_high: f64,
    #[serde(default)]
    pub market: MarketFilter,
    pub top_k: usize,
}

impl Default for TuningParams {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 0.5,
            band_low: 0.5,
            band_high: 2.0,
            market: MarketFilter::All,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl TuningParams {
    /// The bundle as the engine runs it: weights clamped into `[0, 1]`.
    #[must_use]
    pub fn effective(&self) -> Self {
        let weights = ScoringWeights::new(self.alpha, self.beta);
        Self {
            alpha: weights.alpha,
            beta: weights.beta,
            ..self.clone()
        }
    }
}

impl From<&TuningParams> for ScoringOptions {
    fn from(params: &TuningParams) -> Self {
        Self {
            weights: Some(ScoringWeights::new(params.alpha, params.beta)),
            band: ScaleBand::new(params.band_low, params.band_high),
            market: params.market.clone(),
            top_k: params.top_k,
        }
    }
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
