//! Semantic-similarity collaborators
//!
//! The hybrid scorer treats the semantic score as opaque. Everything that
//! shapes or computes it lives behind [`SemanticScorer`] so a real embedding
//! model can replace the built-in backends without touching scoring,
//! filtering or ranking.

use std::collections::HashMap;

use crate::engine::features::QueryFeatures;
use crate::engine::scorer::keyword_score;
use crate::engine::types::Candidate;
use crate::error::{LabError, Result};

/// Provides a contextual similarity in `[0, 1]` between a query and a candidate.
pub trait SemanticScorer: Send + Sync {
    /// Backend name for logs and robot output.
    fn name(&self) -> &str;

    /// Score one candidate. Errors abort the whole scoring run.
    fn score(&self, query: &QueryFeatures, candidate: &Candidate) -> Result<f64>;
}

/// Build the backend named in configuration.
pub fn build_scorer(backend: &str, embedding_dims: usize) -> Result<Box<dyn SemanticScorer>> {
    match backend.to_lowercase().as_str() {
        "heuristic" => Ok(Box::new(HeuristicSemanticScorer)),
        "hash" => Ok(Box::new(HashEmbeddingScorer::new(embedding_dims))),
        other => Err(LabError::Config(format!(
            "unknown semantic backend {other} (expected heuristic|hash)"
        ))),
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Map a hash onto `[0, 1)` using its top 53 bits.
#[allow(clippy::cast_precision_loss)]
fn unit_interval(hash: u64) -> f64 {
    (hash >> 11) as f64 / (1u64 << 53) as f64
}

/// Reference shaping rule standing in for an embedding model.
///
/// Baseline in `[0.1, 0.3)`, +0.4 when the keyword score exceeds 0.5, a
/// further +0.3 for long queries (more than five tokens) with a keyword
/// score above 0.2, capped at 0.95. The baseline is derived from a hash of
/// the query and candidate id so repeated runs agree.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicSemanticScorer;

impl HeuristicSemanticScorer {
    pub const CEILING: f64 = 0.95;

    fn baseline(query: &QueryFeatures, candidate: &Candidate) -> f64 {
        let mut key = query.text().into_bytes();
        key.push(0x1f);
        key.extend_from_slice(candidate.id.as_bytes());
        0.1 + 0.2 * unit_interval(fnv1a(&key))
    }
}

impl SemanticScorer for HeuristicSemanticScorer {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn score(&self, query: &QueryFeatures, candidate: &Candidate) -> Result<f64> {
        let keyword = keyword_score(query, &candidate.keywords);
        let mut score = Self::baseline(query, candidate);
        if keyword > 0.5 {
            score += 0.4;
        }
        if query.query_len > 5 && keyword > 0.2 {
            score += 0.3;
        }
        Ok(score.min(Self::CEILING))
    }
}

/// Hash embeddings (FNV-1a, signed buckets) compared by cosine similarity.
///
/// Tokens and their character trigrams are hashed into a fixed number of
/// dimensions. Fully deterministic, no model files.
#[derive(Debug, Clone)]
pub struct HashEmbeddingScorer {
    dims: usize,
}

impl Default for HashEmbeddingScorer {
    fn default() -> Self {
        Self { dims: 384 }
    }
}

impl HashEmbeddingScorer {
    #[must_use]
    pub fn new(dims: usize) -> Self {
        Self { dims: dims.max(1) }
    }

    #[must_use]
    pub const fn dims(&self) -> usize {
        self.dims
    }

    /// Embed a sequence of tokens into an L2-normalized vector.
    pub fn embed<'a>(&self, tokens: impl IntoIterator<Item = &'a str>) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dims];
        for token in tokens {
            let token = token.to_lowercase();
            self.add_feature(&mut vector, token.as_bytes(), 1.0);
            let chars: Vec<char> = token.chars().collect();
            if chars.len() > 3 {
                for window in chars.windows(3) {
                    let gram: String = window.iter().collect();
                    self.add_feature(&mut vector, gram.as_bytes(), 0.5);
                }
            }
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }

    #[allow(clippy::cast_possible_truncation)]
    fn add_feature(&self, vector: &mut [f32], bytes: &[u8], weight: f32) {
        let hash = fnv1a(bytes);
        let index = (hash % self.dims as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[index] += sign * weight;
    }
}

impl SemanticScorer for HashEmbeddingScorer {
    fn name(&self) -> &str {
        "hash"
    }

    fn score(&self, query: &QueryFeatures, candidate: &Candidate) -> Result<f64> {
        let query_vec = self.embed(query.tokens.iter().map(String::as_str));
        let candidate_vec = self.embed(
            candidate
                .keywords
                .iter()
                .flat_map(|keyword| keyword.split_whitespace())
                .chain(candidate.name.split_whitespace()),
        );
        Ok(f64::from(cosine_similarity(&query_vec, &candidate_vec)).clamp(0.0, 1.0))
    }
}

/// Compute cosine similarity between two vectors
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Scores computed elsewhere, keyed by candidate id.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedSemanticScorer {
    scores: HashMap<String, f64>,
}

impl PrecomputedSemanticScorer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_score(mut self, candidate_id: impl Into<String>, score: f64) -> Self {
        self.scores.insert(candidate_id.into(), score);
        self
    }
}

impl FromIterator<(String, f64)> for PrecomputedSemanticScorer {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

impl SemanticScorer for PrecomputedSemanticScorer {
    fn name(&self) -> &str {
        "precomputed"
    }

    fn score(&self, _query: &QueryFeatures, candidate: &Candidate) -> Result<f64> {
        self.scores
            .get(&candidate.id)
            .copied()
            .ok_or_else(|| LabError::Semantic {
                candidate: candidate.id.clone(),
                message: "no precomputed score".to_string(),
            })
    }
}
