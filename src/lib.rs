//! Anomaly Scoring - scoring and evaluation core
//!
//! Scores uploaded CSV tables against registered anomaly-detection models
//! and reports classification metrics when a `label` column is present.

pub mod api;
pub mod cli;
pub mod constants;
pub mod error;
pub mod logic;

pub use error::{ScoringError, ScoringResult};
pub use logic::config::AppConfig;
pub use logic::pipeline::ScoringPipeline;
pub use logic::registry::ModelRegistry;
