//! Model Module - Scaling, scoring and thresholding
//!
//! Keeps scoring separate from table handling so model families can be
//! swapped without touching the pipeline.

pub mod inference;
pub mod isolation_forest;
pub mod one_class_svm;
pub mod scaler;
pub mod threshold;

// Re-export common types
pub use inference::{score_batch, AnomalyModel, ModelArtifact, ScoredBatch};
pub use scaler::Scaler;
pub use threshold::{ThresholdConfig, ThresholdStrategy};
