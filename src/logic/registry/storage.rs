use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::types::{ArtifactRef, ModelBundle, RegistryEntry, ThresholdSource};
use crate::error::{ScoringError, ScoringResult};
use crate::logic::model::{ModelArtifact, Scaler, ThresholdConfig, ThresholdStrategy};

/// On-disk registry document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryFile {
    /// Base directory for relative artifact paths (relative to this file)
    #[serde(default)]
    pub artifact_dir: Option<PathBuf>,
    pub models: BTreeMap<String, RegistryEntry>,
}

/// Load a registry document from disk
pub fn load_registry_file(path: &Path) -> ScoringResult<RegistryFile> {
    let data = fs::read(path).map_err(|e| ScoringError::artifact(path, e))?;
    let file: RegistryFile = serde_json::from_slice(&data).map_err(|e| ScoringError::artifact(path, e))?;

    if file.models.is_empty() {
        return Err(ScoringError::artifact(path, "registry lists no models"));
    }

    log::info!("Loaded registry from {} ({} models)", path.display(), file.models.len());
    Ok(file)
}

/// Hex-encoded SHA-256 of `data`
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Read an artifact's bytes and verify its pinned digest, if any
pub fn read_artifact(base: &Path, artifact: &ArtifactRef) -> ScoringResult<Vec<u8>> {
    let path = artifact.resolve(base);

    if !path.exists() {
        return Err(ScoringError::artifact(&path, "file not found"));
    }

    let data = fs::read(&path).map_err(|e| ScoringError::artifact(&path, e))?;

    if let Some(expected) = &artifact.sha256 {
        let actual = sha256_hex(&data);
        if !actual.eq_ignore_ascii_case(expected.trim()) {
            return Err(ScoringError::artifact(
                &path,
                format!("checksum mismatch: expected {}, got {}", expected, actual),
            ));
        }
        log::debug!("Checksum verified for {}", path.display());
    }

    Ok(data)
}

fn load_model(base: &Path, artifact: &ArtifactRef) -> ScoringResult<ModelArtifact> {
    let path = artifact.resolve(base);
    log::info!("Loading model from: {}", path.display());

    let data = read_artifact(base, artifact)?;
    let model: ModelArtifact = serde_json::from_slice(&data).map_err(|e| ScoringError::artifact(&path, e))?;
    model.check().map_err(|reason| ScoringError::artifact(&path, reason))?;
    Ok(model)
}

fn load_scaler(base: &Path, artifact: &ArtifactRef) -> ScoringResult<Scaler> {
    let path = artifact.resolve(base);
    log::info!("Loading scaler from: {}", path.display());

    let data = read_artifact(base, artifact)?;
    let scaler: Scaler = serde_json::from_slice(&data).map_err(|e| ScoringError::artifact(&path, e))?;
    scaler.check().map_err(|reason| ScoringError::artifact(&path, reason))?;
    Ok(scaler)
}

fn load_strategy(base: &Path, source: &ThresholdSource) -> ScoringResult<ThresholdStrategy> {
    match source {
        ThresholdSource::Native => Ok(ThresholdStrategy::Native),
        ThresholdSource::ConfigFile(artifact) => {
            let path = artifact.resolve(base);
            let data = read_artifact(base, artifact)?;
            let config = ThresholdConfig::from_slice(&data)
                .map_err(|reason| ScoringError::artifact(&path, reason))?;
            log::info!("Threshold {} loaded from {}", config.threshold, path.display());
            Ok(config.into())
        }
    }
}

/// Deserialize every artifact of `entry` and check they fit together
pub fn load_bundle(base: &Path, model_id: &str, entry: &RegistryEntry) -> ScoringResult<ModelBundle> {
    let model = load_model(base, &entry.model)?;
    let scaler = load_scaler(base, &entry.scaler)?;
    let strategy = load_strategy(base, &entry.threshold)?;

    let model = model.into_model();
    if model.n_features() != scaler.n_features() {
        return Err(ScoringError::artifact(
            entry.model.resolve(base),
            format!(
                "model expects {} features but scaler was fitted on {}",
                model.n_features(),
                scaler.n_features()
            ),
        ));
    }

    let bundle = ModelBundle::new(model_id, model, scaler, strategy);
    log::info!(
        "Bundle {} ready at {}: {} with {} features (layout {:08x}), {} threshold",
        model_id,
        bundle.loaded_at.to_rfc3339(),
        bundle.model.kind(),
        bundle.scaler.n_features(),
        bundle.schema().layout_hash(),
        bundle.strategy.mode_name()
    );

    Ok(bundle)
}
