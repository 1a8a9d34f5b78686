//! Inference Engine - Scaler + model adapter
//!
//! Runs the fitted scaler, then asks the model for one continuous score
//! per record. Every model family follows the same sign convention:
//! **more negative = more anomalous**.

use std::time::Instant;

use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use super::isolation_forest::IsolationForest;
use super::one_class_svm::OneClassSvm;
use super::scaler::Scaler;
use crate::error::{ScoringError, ScoringResult};

// ============================================================================
// ANOMALY MODEL TRAIT
// ============================================================================

/// Trait for fitted anomaly detectors (isolation forest, one-class SVM, ...)
pub trait AnomalyModel: std::fmt::Debug + Send + Sync {
    /// Short family name for logs
    fn kind(&self) -> &'static str;

    /// Number of input columns the model was fitted on
    fn n_features(&self) -> usize;

    /// Continuous score per row; negative values lean anomalous
    fn decision_function(&self, x: ArrayView2<f64>) -> ScoringResult<Array1<f64>>;

    /// Native classification: `-1` anomaly, `+1` normal
    fn predict(&self, x: ArrayView2<f64>) -> ScoringResult<Array1<i8>>;
}

// ============================================================================
// PERSISTED MODEL
// ============================================================================

/// On-disk model artifact, tagged by family
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    IsolationForest(IsolationForest),
    OneClassSvm(OneClassSvm),
}

impl ModelArtifact {
    /// Structural validation run right after deserialization
    pub fn check(&self) -> Result<(), String> {
        match self {
            ModelArtifact::IsolationForest(m) => m.check(),
            ModelArtifact::OneClassSvm(m) => m.check(),
        }
    }

    pub fn into_model(self) -> Box<dyn AnomalyModel> {
        match self {
            ModelArtifact::IsolationForest(m) => Box::new(m),
            ModelArtifact::OneClassSvm(m) => Box::new(m),
        }
    }
}

// ============================================================================
// SCORING
// ============================================================================

/// Output of one scaler + model pass
#[derive(Debug, Clone)]
pub struct ScoredBatch {
    /// Scaled feature matrix, kept for the native classifier
    pub scaled: Array2<f64>,
    /// One score per row
    pub scores: Array1<f64>,
    pub inference_time_us: u64,
}

/// Scale `features` and score every row
pub fn score_batch(
    scaler: &Scaler,
    model: &dyn AnomalyModel,
    features: ArrayView2<f64>,
) -> ScoringResult<ScoredBatch> {
    let start_time = Instant::now();

    let scaled = scaler.transform(features)?;

    if scaled.ncols() != model.n_features() {
        return Err(ScoringError::invalid_table(format!(
            "model expects {} features, scaler produced {}",
            model.n_features(),
            scaled.ncols()
        )));
    }

    let scores = model.decision_function(scaled.view())?;

    if scores.len() != scaled.nrows() {
        return Err(ScoringError::invalid_table(format!(
            "model returned {} scores for {} rows",
            scores.len(),
            scaled.nrows()
        )));
    }
    if let Some(row) = scores.iter().position(|s| !s.is_finite()) {
        return Err(ScoringError::invalid_table(format!(
            "non-finite anomaly score at row {}",
            row + 1
        )));
    }

    let inference_time_us = start_time.elapsed().as_micros() as u64;
    log::debug!(
        "Scored {} rows with {} in {}us",
        scores.len(),
        model.kind(),
        inference_time_us
    );

    Ok(ScoredBatch {
        scaled,
        scores,
        inference_time_us,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::logic::features::FeatureSchema;
    use ndarray::array;

    /// Model whose score is the first scaled column; native rule flags negatives
    #[derive(Debug)]
    pub(crate) struct FirstColumnModel {
        pub n_features: usize,
    }

    impl AnomalyModel for FirstColumnModel {
        fn kind(&self) -> &'static str {
            "first_column"
        }

        fn n_features(&self) -> usize {
            self.n_features
        }

        fn decision_function(&self, x: ArrayView2<f64>) -> ScoringResult<Array1<f64>> {
            Ok(x.column(0).to_owned())
        }

        fn predict(&self, x: ArrayView2<f64>) -> ScoringResult<Array1<i8>> {
            Ok(x.column(0).mapv(|v| if v < 0.0 { -1 } else { 1 }))
        }
    }

    fn identity(names: &[&str]) -> Scaler {
        Scaler::Standard {
            feature_names: FeatureSchema::new(names.iter().copied()),
            mean: None,
            scale: None,
        }
    }

    #[test]
    fn test_score_batch_passes_scores_through() {
        let model = FirstColumnModel { n_features: 2 };
        let x = array![[-0.5, 1.0], [0.1, 2.0]];
        let batch = score_batch(&identity(&["a", "b"]), &model, x.view()).unwrap();
        assert_eq!(batch.scores, array![-0.5, 0.1]);
        assert_eq!(batch.scaled, x);
    }

    #[test]
    fn test_model_width_mismatch() {
        let model = FirstColumnModel { n_features: 3 };
        let x = array![[1.0, 2.0]];
        let result = score_batch(&identity(&["a", "b"]), &model, x.view());
        match result {
            Err(ScoringError::InvalidTable(msg)) => {
                assert_eq!(msg, "model expects 3 features, scaler produced 2")
            }
            other => panic!("expected InvalidTable, got {:?}", other.map(|b| b.scores)),
        }
    }

    #[test]
    fn test_non_finite_scores_rejected() {
        let model = FirstColumnModel { n_features: 1 };
        let scaler = Scaler::Standard {
            feature_names: FeatureSchema::new(["a"]),
            mean: None,
            scale: Some(vec![1e-320]),
        };
        let result = score_batch(&scaler, &model, array![[1e10]].view());
        assert!(matches!(result, Err(ScoringError::InvalidTable(_))));
    }

    #[test]
    fn test_artifact_tag() {
        let json = r#"{"kind":"one_class_svm","n_features":1,"gamma":0.5,
            "support_vectors":[[0.0]],"dual_coef":[1.0],"intercept":-0.5}"#;
        let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        assert!(artifact.check().is_ok());
        assert_eq!(artifact.into_model().kind(), "one_class_svm");
    }
}
