//! Query feature extraction
//!
//! Shallow on purpose: keyword matching is substring based, so tokens are
//! only lower-cased, split on whitespace and deduplicated.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Normalized tokens of a free-text description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFeatures {
    /// Distinct lower-cased tokens in first-occurrence order.
    pub tokens: Vec<String>,
    /// Raw whitespace token count, duplicates included.
    pub query_len: usize,
}

impl QueryFeatures {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Canonical query text (distinct tokens joined by single spaces).
    #[must_use]
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }
}

#[must_use]
pub fn extract_features(text: &str) -> QueryFeatures {
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    let mut query_len = 0;

    for raw in text.split_whitespace() {
        query_len += 1;
        let token = raw.to_lowercase();
        if seen.insert(token.clone()) {
            tokens.push(token);
        }
    }

    QueryFeatures { tokens, query_len }
}
