use serde::Serialize;

use super::breakdown::PredictionOutcome;

/// Metrics for one labeled batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub roc_auc: f64,
    /// `[tn, fp, fn, tp]`
    pub confusion_matrix: [usize; 4],
    /// Cutoff applied, `None` for native decision rules
    pub threshold: Option<f64>,
    pub scores: Vec<f64>,
    pub prediction_breakdown: Vec<PredictionOutcome>,
}
