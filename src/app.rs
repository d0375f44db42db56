use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::config::{Config, DataConfig};
use crate::engine::semantic::build_scorer;
use crate::engine::{PeerEngine, ScoringOptions};
use crate::error::{LabError, Result};
use crate::quality::FileGoldenRepository;
use crate::universe::StaticUniverse;

pub struct AppContext {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub config: Config,
    pub output_format: OutputFormat,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let root = Self::find_root()?;
        let config_path = cli
            .config
            .clone()
            .or_else(|| std::env::var("PEERLAB_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| root.join("config.toml"));
        let config = Config::load(cli.config.as_deref(), &root)?;

        Ok(Self {
            root,
            config_path,
            config,
            output_format: cli.output_format(),
        })
    }

    /// Context over an already loaded configuration.
    #[must_use]
    pub fn with_config(root: PathBuf, config: Config, output_format: OutputFormat) -> Self {
        Self {
            config_path: root.join("config.toml"),
            root,
            config,
            output_format,
        }
    }

    fn find_root() -> Result<PathBuf> {
        if let Ok(root) = std::env::var("PEERLAB_ROOT") {
            return Ok(PathBuf::from(root));
        }
        let cwd = std::env::current_dir()?;
        if let Some(found) = find_upwards(&cwd, ".peerlab") {
            return Ok(found);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| LabError::MissingConfig("data directory not found".to_string()))?;
        Ok(data_dir.join("peerlab"))
    }

    #[must_use]
    pub fn wants_json(&self) -> bool {
        self.output_format == OutputFormat::Json
    }

    /// Engine wired with the configured semantic backend, cap and floor.
    pub fn engine(&self) -> Result<PeerEngine> {
        let semantic = build_scorer(
            &self.config.semantic.backend,
            self.config.semantic.embedding_dims as usize,
        )?;
        Ok(PeerEngine::new(semantic)
            .with_similarity_cap(self.config.scoring.similarity_cap)
            .with_relevance_floor(self.config.filter.relevance_floor))
    }

    #[must_use]
    pub fn scoring_options(&self) -> ScoringOptions {
        self.config.scoring_options()
    }

    #[must_use]
    pub fn universe_path(&self) -> PathBuf {
        DataConfig::resolve(&self.root, &self.config.data.universe_path)
    }

    #[must_use]
    pub fn golden_path(&self) -> PathBuf {
        DataConfig::resolve(&self.root, &self.config.data.golden_path)
    }

    /// Candidate universe from `--universe` or the configured path.
    pub fn universe(&self, override_path: Option<&Path>) -> Result<StaticUniverse> {
        let path = override_path.map_or_else(|| self.universe_path(), Path::to_path_buf);
        StaticUniverse::from_file(path)
    }

    pub fn golden_repository(&self, override_path: Option<&Path>) -> Result<FileGoldenRepository> {
        let path = override_path.map_or_else(|| self.golden_path(), Path::to_path_buf);
        FileGoldenRepository::open(path)
    }
}

fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(name);
        if candidate.is_dir() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}
