#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anomaly_scoring::{ModelRegistry, ScoringPipeline};

/// Single split on the first scaled feature: `x <= 0` lands in the shallow
/// leaf (decision ≈ -0.188), everything else in the deep one (≈ 0.027).
pub const FOREST: &str = r#"{
    "kind": "isolation_forest",
    "n_features": 2,
    "max_samples": 4,
    "offset": -0.5,
    "trees": [{"nodes": [
        {"split": {"feature": 0, "threshold": 0.0, "left": 1, "right": 2}},
        {"leaf": {"n_samples": 1}},
        {"leaf": {"n_samples": 2}}
    ]}]
}"#;

pub const NORMAL_SCALER: &str = r#"{
    "kind": "standard",
    "feature_names": ["dur", "sbytes"],
    "mean": [1.0, 100.0],
    "scale": [1.0, 50.0]
}"#;

/// RBF bump around the origin: far points score below zero
pub const SVM: &str = r#"{
    "kind": "one_class_svm",
    "n_features": 3,
    "gamma": 0.5,
    "support_vectors": [[0.0, 0.0, 0.0]],
    "dual_coef": [1.0],
    "intercept": -0.5
}"#;

pub const HYBRID_SCALER: &str = r#"{
    "kind": "min_max",
    "feature_names": ["dur", "sbytes", "dbytes"],
    "min": [0.0, 0.0, 0.0],
    "scale": [0.1, 0.01, 0.01]
}"#;

/// model3 cutoff sits above every forest score
pub const MODEL3_THRESHOLD: f64 = 0.05;
pub const MODEL4_THRESHOLD: f64 = 0.0;

pub const NORMAL_LABELED: &str = "dur,sbytes,label\n0.5,120,1\n2.0,80,0\n0,300,1\n3.5,100,0\n";
pub const NORMAL_UNLABELED: &str = "dur,sbytes\n0.5,120\n2.0,80\n";
pub const HYBRID_LABELED: &str =
    "dur,sbytes,dbytes,label\n1,10,10,0\n30,200,100,1\n2,20,5,0\n50,0,0,1\n";
pub const HYBRID_UNLABELED: &str = "dur,sbytes,dbytes\n1,10,10\n30,200,100\n";

pub fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// Artifacts for the four stock identifiers, under their stock file names
pub fn write_stock_artifacts(dir: &Path) {
    write(dir, "normal_features_normal_threshold.json", FOREST);
    write(dir, "scaler_normal_features_normal.json", NORMAL_SCALER);

    write(dir, "hybrid_features_normal_threshold.json", SVM);
    write(dir, "scaler_hybrid_features_normal.json", HYBRID_SCALER);

    write(dir, "normal_features_ecdf_threshold.json", FOREST);
    write(dir, "scaler_normal_features_ecdf.json", NORMAL_SCALER);
    write(
        dir,
        "demo_config_normal_ecdf.json",
        &format!(r#"{{"threshold": {}}}"#, MODEL3_THRESHOLD),
    );

    write(dir, "hybrid_features_ecdf_threshold.json", SVM);
    write(dir, "scaler_hybrid_features_ecdf.json", HYBRID_SCALER);
    write(
        dir,
        "demo_config_hybrid_ecdf.json",
        &format!(r#"{{"threshold": {}, "quantile": 0.05}}"#, MODEL4_THRESHOLD),
    );
}

pub fn stock_pipeline(dir: &Path) -> ScoringPipeline {
    write_stock_artifacts(dir);
    ScoringPipeline::new(Arc::new(ModelRegistry::with_defaults(dir)))
}

/// Labeled upload matching the model's feature set
pub fn labeled_csv(model_id: &str) -> &'static str {
    match model_id {
        "model1" | "model3" => NORMAL_LABELED,
        _ => HYBRID_LABELED,
    }
}
