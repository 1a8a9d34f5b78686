//! Artifact Registry
//!
//! Maps model identifiers to their persisted model, scaler and optional
//! threshold config. The registry is built once at start-up and handed to
//! the pipeline; artifacts are read from disk on every lookup unless the
//! cache is switched on.

pub mod cache;
pub mod storage;
pub mod types;


use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::constants::ARTIFACT_EXTENSION;
use crate::error::{ScoringError, ScoringResult};
use crate::logic::config::AppConfig;

pub use cache::ArtifactCache;
pub use storage::{load_bundle, sha256_hex, RegistryFile};
pub use types::{ArtifactRef, ModelBundle, RegistryEntry, ThresholdSource};

/// Immutable identifier → artifacts table
#[derive(Debug)]
pub struct ModelRegistry {
    artifact_dir: PathBuf,
    entries: BTreeMap<String, RegistryEntry>,
    cache: Option<ArtifactCache>,
}

impl ModelRegistry {
    pub fn new(artifact_dir: impl Into<PathBuf>, entries: BTreeMap<String, RegistryEntry>) -> Self {
        Self {
            artifact_dir: artifact_dir.into(),
            entries,
            cache: None,
        }
    }

    /// The four stock models under `artifact_dir`
    pub fn with_defaults(artifact_dir: impl Into<PathBuf>) -> Self {
        Self::new(artifact_dir, default_entries())
    }

    /// Build from a registry document; its `artifact_dir` is taken relative to the file
    pub fn from_file(path: &Path, fallback_dir: &Path) -> ScoringResult<Self> {
        let file = storage::load_registry_file(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let artifact_dir = match file.artifact_dir {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => base.join(dir),
            None => fallback_dir.to_path_buf(),
        };
        Ok(Self::new(artifact_dir, file.models))
    }

    pub fn from_config(config: &AppConfig) -> ScoringResult<Self> {
        let registry = match &config.registry_path {
            Some(path) => Self::from_file(path, &config.artifact_dir)?,
            None => Self::with_defaults(&config.artifact_dir),
        };
        Ok(registry.with_cache(config.cache_artifacts))
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(ArtifactCache::new);
        self
    }

    pub fn artifact_dir(&self) -> &Path {
        &self.artifact_dir
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.entries.contains_key(model_id)
    }

    pub fn entry(&self, model_id: &str) -> Option<&RegistryEntry> {
        self.entries.get(model_id)
    }

    /// Registered identifiers in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn cache(&self) -> Option<&ArtifactCache> {
        self.cache.as_ref()
    }

    /// Resolve `model_id` to its loaded bundle
    pub fn get(&self, model_id: &str) -> ScoringResult<Arc<ModelBundle>> {
        let entry = self
            .entries
            .get(model_id)
            .ok_or_else(|| ScoringError::UnknownModel(model_id.to_string()))?;

        if let Some(cache) = &self.cache {
            if let Some(bundle) = cache.get(model_id) {
                log::debug!(
                    "Bundle {} served from cache (loaded {}s ago)",
                    model_id,
                    bundle.age().num_seconds()
                );
                return Ok(bundle);
            }
        }

        let bundle = Arc::new(load_bundle(&self.artifact_dir, model_id, entry)?);

        Ok(match &self.cache {
            Some(cache) => cache.insert(bundle),
            None => bundle,
        })
    }
}

fn artifact(stem: &str) -> ArtifactRef {
    ArtifactRef::new(format!("{}.{}", stem, ARTIFACT_EXTENSION))
}

/// model1/model2 use their native boundary; model3/model4 carry an ECDF threshold
pub fn default_entries() -> BTreeMap<String, RegistryEntry> {
    let mut entries = BTreeMap::new();
    entries.insert(
        "model1".to_string(),
        RegistryEntry::native(
            artifact("normal_features_normal_threshold"),
            artifact("scaler_normal_features_normal"),
        ),
    );
    entries.insert(
        "model2".to_string(),
        RegistryEntry::native(
            artifact("hybrid_features_normal_threshold"),
            artifact("scaler_hybrid_features_normal"),
        ),
    );
    entries.insert(
        "model3".to_string(),
        RegistryEntry::externally_configured(
            artifact("normal_features_ecdf_threshold"),
            artifact("scaler_normal_features_ecdf"),
            artifact("demo_config_normal_ecdf"),
        ),
    );
    entries.insert(
        "model4".to_string(),
        RegistryEntry::externally_configured(
            artifact("hybrid_features_ecdf_threshold"),
            artifact("scaler_hybrid_features_ecdf"),
            artifact("demo_config_hybrid_ecdf"),
        ),
    );
    entries
}
