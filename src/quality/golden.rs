//! Golden peer sets and their read-only repository.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LabError, Result};

/// A peer the analyst considers ground truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenPeer {
    pub id: String,
    #[serde(default)]
    pub stock_code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl GoldenPeer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stock_code: None,
            name: None,
        }
    }
}

/// Analyst-curated ground truth for one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenPeerSet {
    pub id: String,
    pub target_label: String,
    /// Identifier of the listed target; `None` for virtual targets.
    #[serde(default)]
    pub target_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub peers: Vec<GoldenPeer>,
}

impl GoldenPeerSet {
    pub fn new(
        id: impl Into<String>,
        target_label: impl Into<String>,
        peer_ids: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            target_label: target_label.into(),
            target_id: None,
            created_at: None,
            peers: peer_ids.iter().map(|id| GoldenPeer::new(*id)).collect(),
        }
    }

    /// Distinct ground-truth identifiers.
    #[must_use]
    pub fn identifiers(&self) -> HashSet<&str> {
        self.peers.iter().map(|peer| peer.id.as_str()).collect()
    }
}

/// Read-only lookup of golden sets.
pub trait GoldenRepository: Send + Sync {
    fn list(&self) -> Result<Vec<GoldenPeerSet>>;

    fn get(&self, id: &str) -> Result<GoldenPeerSet> {
        self.list()?
            .into_iter()
            .find(|set| set.id == id)
            .ok_or_else(|| LabError::GoldenSetNotFound(id.to_string()))
    }
}

/// Golden sets held in memory, typically supplied by tests or callers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGoldenRepository {
    sets: Vec<GoldenPeerSet>,
}

impl InMemoryGoldenRepository {
    #[must_use]
    pub fn new(sets: Vec<GoldenPeerSet>) -> Self {
        Self { sets }
    }
}

impl GoldenRepository for InMemoryGoldenRepository {
    fn list(&self) -> Result<Vec<GoldenPeerSet>> {
        Ok(self.sets.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
struct GoldenFile {
    #[serde(default)]
    sets: Vec<GoldenPeerSet>,
}

/// Golden sets loaded from a TOML or JSON file (`[[sets]]` / `{"sets": [...]}`).
///
/// A missing file is an empty repository.
#[derive(Debug, Clone)]
pub struct FileGoldenRepository {
    path: PathBuf,
    sets: Vec<GoldenPeerSet>,
}

impl FileGoldenRepository {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            debug!(target: "golden", path = %path.display(), "golden file missing; empty repository");
            return Ok(Self {
                path,
                sets: Vec::new(),
            });
        }

        let raw = std::fs::read_to_string(&path)?;
        let file: GoldenFile = if is_json(&path) {
            serde_json::from_str(&raw)?
        } else {
            toml::from_str(&raw)?
        };

        let mut seen = HashSet::new();
        for set in &file.sets {
            if !seen.insert(set.id.as_str()) {
                return Err(LabError::ValidationFailed(format!(
                    "duplicate golden set id {} in {}",
                    set.id,
                    path.display()
                )));
            }
        }

        debug!(target: "golden", path = %path.display(), sets = file.sets.len(), "loaded golden sets");
        Ok(Self {
            path,
            sets: file.sets,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GoldenRepository for FileGoldenRepository {
    fn list(&self) -> Result<Vec<GoldenPeerSet>> {
        Ok(self.sets.clone())
    }
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::UnitTestFixture;

    #[test]
    fn in_memory_lookup() {
        let repo = InMemoryGoldenRepository::new(vec![
            GoldenPeerSet::new("golden-1", "Samsung Electronics", &["000660", "066570"]),
            GoldenPeerSet::new("golden-2", "Virtual - Brokerage", &["006800"]),
        ]);
        assert_eq!(repo.list().unwrap().len(), 2);
        assert_eq!(repo.get("golden-2").unwrap().peers.len(), 1);
        assert!(matches!(
            repo.get("golden-3"),
            Err(LabError::GoldenSetNotFound(_))
        ));
    }

    #[test]
    fn identifiers_are_deduplicated() {
        let set = GoldenPeerSet::new("g", "t", &["a", "b", "a"]);
        assert_eq!(set.identifiers().len(), 2);
    }

    #[test]
    fn loads_toml_file() {
        let fixture = UnitTestFixture::new();
        let path = fixture.create_file(
            "golden.toml",
            r#"
[[sets]]
id = "golden-1"
target_label = "Samsung Electronics (semiconductor/mobile)"
target_id = "00126380"
created_at = "2024-05-01T09:00:00Z"

[[sets.peers]]
id = "000660"
name = "SK Hynix"

[[sets.peers]]
id = "066570"
"#,
        );
        let repo = FileGoldenRepository::open(&path).unwrap();
        let set = repo.get("golden-1").unwrap();
        assert_eq!(set.target_id.as_deref(), Some("00126380"));
        assert_eq!(set.peers.len(), 2);
        assert!(set.created_at.is_some());
    }

    #[test]
    fn loads_json_file() {
        let fixture = UnitTestFixture::new();
        let path = fixture.create_file(
            "golden.json",
            r#"{"sets": [{"id": "g", "target_label": "Virtual", "peers": [{"id": "005940"}]}]}"#,
        );
        let repo = FileGoldenRepository::open(&path).unwrap();
        assert_eq!(repo.list().unwrap()[0].peers[0].id, "005940");
    }

    #[test]
    fn missing_file_is_empty() {
        let fixture = UnitTestFixture::new();
        let repo = FileGoldenRepository::open(fixture.data_path.join("absent.toml")).unwrap();
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let fixture = UnitTestFixture::new();
        let path = fixture.create_file(
            "golden.toml",
            "[[sets]]\nid = \"g\"\ntarget_label = \"a\"\n\n[[sets]]\nid = \"g\"\ntarget_label = \"b\"\n",
        );
        assert!(matches!(
            FileGoldenRepository::open(&path),
            Err(LabError::ValidationFailed(_))
        ));
    }
}
