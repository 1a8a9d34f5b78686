//! Evaluation Module - Metrics for labeled batches
//!
//! Only runs when the upload carried a `label` column.
//! Scores follow the model convention (lower = more anomalous), so they
//! are negated before ranking.

pub mod breakdown;
pub mod distribution;
pub mod metrics;
pub mod report;
pub mod roc;

pub use breakdown::{prediction_breakdown, Correctness, PredictionOutcome};
pub use distribution::{predicted_anomaly_rate, summary_line, ScoreDistribution, Stability};
pub use metrics::ConfusionMatrix;
pub use report::MetricsReport;
pub use roc::roc_auc;

use crate::error::{ScoringError, ScoringResult};

/// Compute the full metrics report for one batch
pub fn evaluate(
    labels: &[u8],
    predictions: &[u8],
    scores: &[f64],
    threshold: Option<f64>,
) -> ScoringResult<MetricsReport> {
    let cm = ConfusionMatrix::from_labels(labels, predictions)?;

    let ranking: Vec<f64> = scores.iter().map(|s| -s).collect();
    let auc = roc_auc(&ranking, labels).ok_or_else(|| ScoringError::SingleClassLabels {
        class: labels.first().copied().unwrap_or_default(),
        records: labels.len(),
    })?;

    log::info!(
        "Evaluation: confusion [tn={}, fp={}, fn={}, tp={}], accuracy {:.4}",
        cm.tn,
        cm.fp,
        cm.fn_,
        cm.tp,
        cm.accuracy()
    );

    Ok(MetricsReport {
        accuracy: cm.accuracy(),
        precision: cm.precision(),
        recall: cm.recall(),
        f1_score: cm.f1(),
        roc_auc: auc,
        confusion_matrix: cm.to_array(),
        threshold,
        scores: scores.to_vec(),
        prediction_breakdown: prediction_breakdown(labels, predictions),
    })
}
