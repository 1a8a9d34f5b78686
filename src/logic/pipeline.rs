//! Scoring Pipeline
//!
//! Registry lookup → feature preparation → scaling and scoring →
//! thresholding → (labeled batches only) evaluation → response assembly.
//! One call is one synchronous run; nothing is shared between runs except
//! the registry and its optional cache.

use std::sync::Arc;

use super::evaluation;
use super::features::{prepare_features, RecordTable};
use super::model::score_batch;
use super::registry::{ModelBundle, ModelRegistry};
use super::response::{ScoredTable, ScoringOutcome};
use crate::error::ScoringResult;

#[derive(Debug, Clone)]
pub struct ScoringPipeline {
    registry: Arc<ModelRegistry>,
}

impl ScoringPipeline {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Score a CSV upload against `model_id`
    ///
    /// The identifier is resolved before the upload is parsed, so an unknown
    /// model never reaches the scoring stages.
    pub fn run(&self, model_id: &str, content: &[u8]) -> ScoringResult<ScoringOutcome> {
        self.run_with_bundle(model_id, content).map(|(_, outcome)| outcome)
    }

    /// Same as [`run`](Self::run), also handing back the bundle that scored the upload
    pub fn run_with_bundle(
        &self,
        model_id: &str,
        content: &[u8],
    ) -> ScoringResult<(Arc<ModelBundle>, ScoringOutcome)> {
        let bundle = self.registry.get(model_id)?;
        let table = RecordTable::from_csv_bytes(content)?;
        let outcome = score_table(&bundle, table)?;
        Ok((bundle, outcome))
    }
}

/// Run every stage after the registry lookup on an already-parsed table
pub fn score_table(bundle: &ModelBundle, table: RecordTable) -> ScoringResult<ScoringOutcome> {
    log::info!(
        "Scoring {} records with {} ({}, {} threshold)",
        table.len(),
        bundle.model_id,
        bundle.model.kind(),
        bundle.strategy.mode_name()
    );

    let prepared = prepare_features(&table, bundle.schema())?;
    let batch = score_batch(&bundle.scaler, bundle.model.as_ref(), prepared.matrix.view())?;
    let predictions = bundle
        .strategy
        .classify(bundle.model.as_ref(), batch.scaled.view(), batch.scores.view())?;
    let scores = batch.scores.to_vec();

    let metrics = match &prepared.labels {
        Some(labels) => Some(evaluation::evaluate(
            labels,
            &predictions,
            &scores,
            bundle.strategy.threshold(),
        )?),
        None => {
            log::debug!("No label column, skipping evaluation");
            None
        }
    };

    let data = ScoredTable::new(table, scores, predictions)?;
    log::info!(
        "Scored {} records with {}: {} anomalies ({}us inference)",
        data.len(),
        bundle.model_id,
        data.anomaly_count(),
        batch.inference_time_us
    );

    Ok(ScoringOutcome { data, metrics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoringError;
    use crate::logic::features::FeatureSchema;
    use crate::logic::model::inference::tests::FirstColumnModel;
    use crate::logic::model::{Scaler, ThresholdStrategy};
    use std::collections::BTreeMap;

    fn bundle(strategy: ThresholdStrategy) -> ModelBundle {
        ModelBundle::new(
            "model3",
            Box::new(FirstColumnModel { n_features: 1 }),
            Scaler::Standard {
                feature_names: FeatureSchema::new(["x"]),
                mean: None,
                scale: None,
            },
            strategy,
        )
    }

    fn table(csv: &str) -> RecordTable {
        RecordTable::from_csv_bytes(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_external_threshold_scenario() {
        let outcome = score_table(
            &bundle(ThresholdStrategy::ExternallyConfigured(0.0)),
            table("x,label\n-0.5,1\n0.1,0\n-2.0,1\n3.0,0\n"),
        )
        .unwrap();

        assert_eq!(outcome.data.predictions(), &[1, 0, 1, 0]);
        let metrics = outcome.metrics.unwrap();
        assert_eq!(metrics.accuracy, 1.0);
        assert_eq!(metrics.confusion_matrix, [2, 0, 0, 2]);
        assert_eq!(metrics.threshold, Some(0.0));
        assert_eq!(metrics.scores, vec![-0.5, 0.1, -2.0, 3.0]);
        assert_eq!(metrics.roc_auc, 1.0);
    }

    #[test]
    fn test_native_mode_reports_null_threshold() {
        let outcome = score_table(
            &bundle(ThresholdStrategy::Native),
            table("x,label\n-1,1\n1,0\n"),
        )
        .unwrap();
        assert_eq!(outcome.data.predictions(), &[1, 0]);
        assert_eq!(outcome.metrics.unwrap().threshold, None);
    }

    #[test]
    fn test_unlabeled_batch_has_no_metrics() {
        let outcome = score_table(&bundle(ThresholdStrategy::Native), table("x\n-1\n2\n")).unwrap();
        assert!(outcome.metrics.is_none());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["metrics"], serde_json::json!({}));
        assert_eq!(json["data"][1]["prediction"], 0);
    }

    #[test]
    fn test_schema_mismatch_stops_run() {
        let result = score_table(&bundle(ThresholdStrategy::Native), table("y\n1\n"));
        assert!(matches!(result, Err(ScoringError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_run_hands_back_bundle() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("svm.json"),
            r#"{"kind":"one_class_svm","n_features":1,"gamma":1.0,
                "support_vectors":[[0.0]],"dual_coef":[1.0],"intercept":-0.5}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("scaler.json"),
            r#"{"kind":"standard","feature_names":["x"]}"#,
        )
        .unwrap();
        let mut entries = BTreeMap::new();
        entries.insert(
            "svm".to_string(),
            crate::logic::registry::RegistryEntry::native("svm.json", "scaler.json"),
        );
        let pipeline = ScoringPipeline::new(Arc::new(ModelRegistry::new(dir.path(), entries)));

        let (bundle, outcome) = pipeline.run_with_bundle("svm", b"x
0
3
").unwrap();
        assert_eq!(bundle.model_id, "svm");
        assert_eq!(bundle.strategy, ThresholdStrategy::Native);
        assert_eq!(outcome.data.predictions(), &[0, 1]);
        assert_eq!(pipeline.run("svm", b"x
0
3
").unwrap(), outcome);
    }

    #[test]
    fn test_unknown_model_skips_parsing() {
        let pipeline = ScoringPipeline::new(Arc::new(ModelRegistry::new("unused", BTreeMap::new())));
        // Invalid CSV would fail if it were parsed
        let result = pipeline.run("model9", b"a,a\n1,2\n");
        assert!(matches!(result, Err(ScoringError::UnknownModel(id)) if id == "model9"));
    }
}
