//! Threshold Strategy
//!
//! Turns continuous scores into 0/1 predictions.
//! Either the model's own decision rule is used, or a cutoff tuned offline
//! (e.g. from an empirical score distribution) is applied as-is.

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::inference::AnomalyModel;
use crate::error::{ScoringError, ScoringResult};

/// Threshold Configuration (JSON document produced alongside the model)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Scores strictly below this are anomalies
    pub threshold: f64,
}

impl ThresholdConfig {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Parse the JSON document; unknown keys are ignored
    pub fn from_slice(data: &[u8]) -> Result<Self, String> {
        let config: ThresholdConfig = serde_json::from_slice(data).map_err(|e| e.to_string())?;
        if !config.threshold.is_finite() {
            return Err("threshold must be finite".to_string());
        }
        Ok(config)
    }
}

/// How a bundle classifies scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", content = "threshold", rename_all = "snake_case")]
pub enum ThresholdStrategy {
    /// Model's own classifier (`-1` anomaly, `+1` normal)
    Native,
    /// Anomaly iff `score < threshold`
    ExternallyConfigured(f64),
}

impl ThresholdStrategy {
    /// Threshold reported in metrics (`None` for native mode)
    pub fn threshold(&self) -> Option<f64> {
        match self {
            ThresholdStrategy::Native => None,
            ThresholdStrategy::ExternallyConfigured(t) => Some(*t),
        }
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            ThresholdStrategy::Native => "native",
            ThresholdStrategy::ExternallyConfigured(_) => "externally_configured",
        }
    }

    /// Classify every row: 1 = anomaly, 0 = normal
    pub fn classify(
        &self,
        model: &dyn AnomalyModel,
        scaled: ArrayView2<f64>,
        scores: ArrayView1<f64>,
    ) -> ScoringResult<Vec<u8>> {
        let predictions = match self {
            ThresholdStrategy::Native => {
                let raw = model.predict(scaled)?;
                native_to_binary(raw.view())
            }
            ThresholdStrategy::ExternallyConfigured(threshold) => apply_cutoff(scores, *threshold),
        };

        if predictions.len() != scores.len() {
            return Err(ScoringError::invalid_table(format!(
                "classifier returned {} labels for {} rows",
                predictions.len(),
                scores.len()
            )));
        }

        Ok(predictions)
    }
}

impl From<ThresholdConfig> for ThresholdStrategy {
    fn from(config: ThresholdConfig) -> Self {
        ThresholdStrategy::ExternallyConfigured(config.threshold)
    }
}

/// `-1` becomes 1 (anomaly), anything else 0
pub fn native_to_binary(raw: ArrayView1<i8>) -> Vec<u8> {
    raw.iter().map(|&v| u8::from(v == -1)).collect()
}

/// 1 where `score < threshold`
pub fn apply_cutoff(scores: ArrayView1<f64>, threshold: f64) -> Vec<u8> {
    scores.iter().map(|&s| u8::from(s < threshold)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::inference::tests::FirstColumnModel;
    use ndarray::array;

    #[test]
    fn test_threshold_config_parse() {
        let config = ThresholdConfig::from_slice(br#"{"threshold": -0.12, "quantile": 0.05}"#).unwrap();
        assert_eq!(config.threshold, -0.12);
    }

    #[test]
    fn test_threshold_config_missing_key() {
        assert!(ThresholdConfig::from_slice(br#"{"cutoff": 1.0}"#).is_err());
    }

    #[test]
    fn test_cutoff_is_strict() {
        let scores = array![-0.5, 0.1, -2.0, 3.0, 0.0];
        assert_eq!(apply_cutoff(scores.view(), 0.0), vec![1, 0, 1, 0, 0]);
    }

    #[test]
    fn test_native_translation() {
        let raw = array![-1i8, 1, 1, -1];
        assert_eq!(native_to_binary(raw.view()), vec![1, 0, 0, 1]);
    }

    #[test]
    fn test_native_mode_uses_model_rule() {
        let model = FirstColumnModel { n_features: 1 };
        let scaled = array![[-1.0], [2.0]];
        // Scores disagree with the model's rule on purpose
        let scores = array![5.0, -5.0];
        let preds = ThresholdStrategy::Native
            .classify(&model, scaled.view(), scores.view())
            .unwrap();
        assert_eq!(preds, vec![1, 0]);
    }

    #[test]
    fn test_external_mode_ignores_model_rule() {
        let model = FirstColumnModel { n_features: 1 };
        let scaled = array![[-1.0], [2.0]];
        let scores = array![5.0, -5.0];
        let preds = ThresholdStrategy::ExternallyConfigured(0.0)
            .classify(&model, scaled.view(), scores.view())
            .unwrap();
        assert_eq!(preds, vec![0, 1]);
    }

    #[test]
    fn test_reported_threshold() {
        assert_eq!(ThresholdStrategy::Native.threshold(), None);
        let strategy: ThresholdStrategy = ThresholdConfig::new(0.25).into();
        assert_eq!(strategy.threshold(), Some(0.25));
        assert_eq!(strategy.mode_name(), "externally_configured");
    }
}
