//! Per-peer rationale records

use serde::{Deserialize, Serialize};

use crate::engine::types::{PeerResult, TargetProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityTier {
    /// Similarity above 0.8.
    VerySimilar,
    /// Similarity above 0.6.
    Related,
    Partial,
}

impl SimilarityTier {
    #[must_use]
    pub fn from_similarity(similarity: f64) -> Self {
        if similarity > 0.8 {
            Self::VerySimilar
        } else if similarity > 0.6 {
            Self::Related
        } else {
            Self::Partial
        }
    }

    const fn phrase(self) -> &'static str {
        match self {
            Self::VerySimilar => "has a very similar business",
            Self::Related => "shares business areas",
            Self::Partial => "overlaps in some business areas",
        }
    }
}

/// Which signal carried the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBasis {
    Keyword,
    Semantic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerExplanation {
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub market: String,
    pub similarity: f64,
    pub keyword_score: f64,
    pub semantic_score: f64,
    pub scale_metric: String,
    pub target_scale: Option<f64>,
    pub peer_scale: Option<f64>,
    /// Peer scale divided by target scale, when both are usable.
    pub scale_ratio: Option<f64>,
    pub tier: SimilarityTier,
    pub basis: MatchBasis,
    pub summary: String,
}

/// Build one explanation per ranked peer.
#[must_use]
pub fn explain_peers(target: &TargetProfile, result: &PeerResult) -> Vec<PeerExplanation> {
    let target_scale = target.band_scale();

    result
        .peers
        .iter()
        .map(|peer| {
            let scored = &peer.scored;
            let candidate = &scored.candidate;
            let scale_ratio = target_scale.zip(candidate.scale).map(|(t, p)| p / t);
            let tier = SimilarityTier::from_similarity(scored.similarity);
            let basis = if scored.keyword_score > 0.7 {
                MatchBasis::Keyword
            } else {
                MatchBasis::Semantic
            };

            let scale_phrase = match (scale_ratio, candidate.scale) {
                (Some(ratio), _) => format!("is about {ratio:.1}x the target's revenue"),
                (None, Some(scale)) => format!("has revenue of about {}", format_amount(scale)),
                (None, None) => "has no revenue figure".to_string(),
            };
            let basis_phrase = match basis {
                MatchBasis::Keyword => "selected on matching industry and product keywords",
                MatchBasis::Semantic => "selected on contextual text similarity",
            };

            PeerExplanation {
                rank: peer.rank,
                id: candidate.id.clone(),
                name: candidate.name.clone(),
                market: candidate.market.clone(),
                similarity: scored.similarity,
                keyword_score: scored.keyword_score,
                semantic_score: scored.semantic_score,
                scale_metric: "revenue".to_string(),
                target_scale,
                peer_scale: candidate.scale,
                scale_ratio,
                tier,
                basis,
                summary: format!(
                    "{} {}, {} and was {}.",
                    candidate.name,
                    tier.phrase(),
                    scale_phrase,
                    basis_phrase
                ),
            }
        })
        .collect()
}

/// Compact amount: trillions as `T`, billions as `B`.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    let abs = amount.abs();
    if abs >= 1e12 {
        format!("{:.1}T", amount / 1e12)
    } else if abs >= 1e9 {
        format!("{:.1}B", amount / 1e9)
    } else {
        format!("{amount:.0}")
    }
}
