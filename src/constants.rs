//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Environment variables override these at start-up.

/// Default directory holding model, scaler and threshold artifacts
pub const DEFAULT_ARTIFACT_DIR: &str = "artifacts";

/// Extension used for all persisted artifacts
pub const ARTIFACT_EXTENSION: &str = "json";

/// Name of the ground-truth column in uploaded tables
pub const LABEL_COLUMN: &str = "label";

/// Column appended with the continuous model score
pub const SCORE_COLUMN: &str = "anomaly_score";

/// Column appended with the binary prediction
pub const PREDICTION_COLUMN: &str = "prediction";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "anomaly-scoring";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get artifact directory from environment or use default
pub fn get_artifact_dir() -> String {
    std::env::var("SCORING_ARTIFACT_DIR")
        .unwrap_or_else(|_| DEFAULT_ARTIFACT_DIR.to_string())
}

/// Get registry file path from environment, if one is configured
pub fn get_registry_path() -> Option<String> {
    std::env::var("SCORING_REGISTRY")
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Check if artifact caching is enabled (off unless explicitly requested)
pub fn is_artifact_cache_enabled() -> bool {
    std::env::var("SCORING_CACHE_ARTIFACTS")
        .map(|s| s.to_lowercase() == "true" || s == "1")
        .unwrap_or(false)
}
