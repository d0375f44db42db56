//! Error types for peerlab

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LabError>;

#[derive(Error, Debug)]
pub enum LabError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Golden peer set not found: {0}")]
    GoldenSetNotFound(String),

    /// The semantic-similarity collaborator could not produce a score.
    #[error("Semantic scoring failed for {candidate}: {message}")]
    Semantic { candidate: String, message: String },

    /// The candidate pool provider failed to load or fetch candidates.
    #[error("Candidate pool unavailable ({}): {message}", path.display())]
    PoolUnavailable { path: PathBuf, message: String },
}

impl LabError {
    /// Short machine-readable code used in robot-mode error envelopes.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
            Self::TomlParse(_) => "toml_error",
            Self::Config(_) | Self::MissingConfig(_) => "config_error",
            Self::ValidationFailed(_) => "validation_failed",
            Self::GoldenSetNotFound(_) => "golden_set_not_found",
            Self::Semantic { .. } => "semantic_unavailable",
            Self::PoolUnavailable { .. } => "pool_unavailable",
        }
    }
}
