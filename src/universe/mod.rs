//! Candidate universe: where the pool of comparable companies comes from.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::diagnostics::find_candidate;
use crate::engine::{Candidate, TargetProfile};
use crate::error::{LabError, Result};
use crate::quality::golden::is_json;

/// Supplies the candidate pool for a target.
pub trait CandidatePool: Send + Sync {
    fn candidates(&self, target: &TargetProfile) -> Result<Vec<Candidate>>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct UniverseFile {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// A fixed list of candidates, optionally loaded from a TOML or JSON file.
#[derive(Debug, Clone, Default)]
pub struct StaticUniverse {
    source: Option<PathBuf>,
    candidates: Vec<Candidate>,
}

impl StaticUniverse {
    #[must_use]
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            source: None,
            candidates,
        }
    }

    /// Load `[[candidates]]` (TOML) or `{"candidates": [...]}` (JSON).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let unavailable = |message: String| LabError::PoolUnavailable {
            path: path.to_path_buf(),
            message,
        };

        let raw = std::fs::read_to_string(path).map_err(|err| unavailable(err.to_string()))?;
        let file: UniverseFile = if is_json(path) {
            serde_json::from_str(&raw).map_err(|err| unavailable(err.to_string()))?
        } else {
            toml::from_str(&raw).map_err(|err| unavailable(err.to_string()))?
        };

        let mut seen = HashSet::new();
        for candidate in &file.candidates {
            if !seen.insert(candidate.id.as_str()) {
                return Err(LabError::ValidationFailed(format!(
                    "duplicate candidate id {} in {}",
                    candidate.id,
                    path.display()
                )));
            }
        }

        let broken = file
            .candidates
            .iter()
            .filter(|candidate| candidate.extraction_error.is_some())
            .count();
        if broken > 0 {
            warn!(target: "universe", broken, "candidates carry extraction errors");
        }
        debug!(
            target: "universe",
            path = %path.display(),
            candidates = file.candidates.len(),
            "loaded candidate universe"
        );

        Ok(Self {
            source: Some(path.to_path_buf()),
            candidates: file.candidates,
        })
    }

    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    #[must_use]
    pub fn all(&self) -> &[Candidate] {
        &self.candidates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[must_use]
    pub fn find(&self, needle: &str) -> Option<&Candidate> {
        find_candidate(&self.candidates, needle)
    }

    /// Listed target built from a universe entry; its keywords become the query.
    pub fn listed_target(&self, needle: &str) -> Result<TargetProfile> {
        let candidate = self.find(needle).ok_or_else(|| {
            LabError::ValidationFailed(format!("target {needle} is not in the candidate universe"))
        })?;
        Ok(TargetProfile::listed(
            candidate.id.clone(),
            candidate.name.clone(),
            candidate.keywords.join(" "),
            candidate.scale,
        ))
    }
}

impl CandidatePool for StaticUniverse {
    fn candidates(&self, _target: &TargetProfile) -> Result<Vec<Candidate>> {
        Ok(self.candidates.clone())
    }
}
