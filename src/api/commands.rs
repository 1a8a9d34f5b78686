//! Commands - request boundary
//!
//! Takes a model identifier plus raw CSV bytes and returns serializable
//! payloads. An unknown identifier is answered with the error payload
//! rather than an `Err`; every other failure propagates.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ScoringResult;
use crate::logic::evaluation::{predicted_anomaly_rate, summary_line, ScoreDistribution, Stability};
use crate::logic::pipeline::ScoringPipeline;
use crate::logic::registry::{ModelRegistry, ThresholdSource};
use crate::logic::response::ScoreResponse;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Registered model, as listed without loading its artifacts
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model_id: String,
    pub model: PathBuf,
    pub scaler: PathBuf,
    /// "native" or "externally_configured"
    pub threshold_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_config: Option<PathBuf>,
}

/// Score distribution of one upload
#[derive(Debug, Clone, Serialize)]
pub struct DistributionSummary {
    pub model_id: String,
    pub threshold_mode: &'static str,
    pub threshold: Option<f64>,
    /// When the scoring bundle was read from disk
    pub loaded_at: DateTime<Utc>,
    pub records: usize,
    pub anomalies: usize,
    /// Percent of records predicted anomalous, for every mode
    pub predicted_anomaly_rate: f64,
    pub stability: Stability,
    pub verdict: &'static str,
    pub distribution: ScoreDistribution,
    /// Present for labeled uploads only
    pub summary: Option<String>,
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Score an upload; unknown identifiers yield `{"error": "Invalid model_id: <id>"}`
pub fn predict(pipeline: &ScoringPipeline, model_id: &str, content: &[u8]) -> ScoringResult<ScoreResponse> {
    match pipeline.run(model_id, content) {
        Ok(outcome) => Ok(outcome.into()),
        Err(e) if e.is_unknown_model() => {
            log::warn!("Rejected request: {}", e);
            Ok(ScoreResponse::error(e.to_string()))
        }
        Err(e) => Err(e),
    }
}

/// Score an upload and summarize the resulting score distribution
pub fn summarize(
    pipeline: &ScoringPipeline,
    model_id: &str,
    content: &[u8],
) -> ScoringResult<DistributionSummary> {
    let (bundle, outcome) = pipeline.run_with_bundle(model_id, content)?;

    let threshold = bundle.strategy.threshold();
    let distribution = ScoreDistribution::from_scores(outcome.data.scores(), threshold);
    let rate = predicted_anomaly_rate(outcome.data.predictions());
    let stability = Stability::from_rate(rate);

    Ok(DistributionSummary {
        model_id: model_id.to_string(),
        threshold_mode: bundle.strategy.mode_name(),
        threshold,
        loaded_at: bundle.loaded_at,
        records: outcome.data.len(),
        anomalies: outcome.data.anomaly_count(),
        predicted_anomaly_rate: rate,
        stability,
        verdict: stability.verdict(),
        distribution,
        summary: outcome.metrics.as_ref().map(summary_line),
    })
}

/// Registered identifiers with their artifact paths
pub fn list_models(registry: &ModelRegistry) -> Vec<ModelInfo> {
    registry
        .ids()
        .filter_map(|id| registry.entry(id).map(|entry| (id, entry)))
        .map(|(id, entry)| {
            let (threshold_mode, threshold_config) = match &entry.threshold {
                ThresholdSource::Native => ("native", None),
                ThresholdSource::ConfigFile(config) => {
                    ("externally_configured", Some(config.resolve(registry.artifact_dir())))
                }
            };
            ModelInfo {
                model_id: id.to_string(),
                model: entry.model.resolve(registry.artifact_dir()),
                scaler: entry.scaler.resolve(registry.artifact_dir()),
                threshold_mode,
                threshold_config,
            }
        })
        .collect()
}
