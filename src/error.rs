//! Error handling

use std::path::PathBuf;
use thiserror::Error;

pub type ScoringResult<T> = Result<T, ScoringError>;

#[derive(Debug, Error)]
pub enum ScoringError {
    /// Identifier not present in the registry
    #[error("Invalid model_id: {0}")]
    UnknownModel(String),

    /// Feature columns disagree with the scaler's trained schema
    #[error(
        "Feature schema mismatch: expected {expected:?} (hash: {expected_hash:08x}), \
         got {actual:?} (hash: {actual_hash:08x})"
    )]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
        expected_hash: u32,
        actual_hash: u32,
    },

    /// Label column holds something other than 0 or 1
    #[error("Malformed label at row {row}: {value:?} (expected 0 or 1)")]
    MalformedLabel { row: usize, value: String },

    /// ROC-AUC needs both classes among the labels
    #[error("ROC-AUC is undefined: all {records} labels are {class}")]
    SingleClassLabels { class: u8, records: usize },

    /// Model, scaler or threshold config could not be loaded
    #[error("Failed to load artifact {}: {reason}", path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    /// Input table could not be parsed or scored
    #[error("Invalid table: {0}")]
    InvalidTable(String),
}

impl ScoringError {
    pub fn artifact(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ScoringError::ArtifactLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_table(reason: impl Into<String>) -> Self {
        ScoringError::InvalidTable(reason.into())
    }

    pub fn is_unknown_model(&self) -> bool {
        matches!(self, ScoringError::UnknownModel(_))
    }
}

impl From<csv::Error> for ScoringError {
    fn from(err: csv::Error) -> Self {
        ScoringError::InvalidTable(err.to_string())
    }
}
