//! peerlab - comparable-company peer matching
//!
//! Scores a candidate pool against a listed or virtual target company,
//! filters by scale band and relevance, ranks the survivors and evaluates
//! the ranking against analyst-curated golden peer sets.

pub mod app;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod quality;
pub mod test_utils;
pub mod universe;

pub use error::{LabError, Result};
