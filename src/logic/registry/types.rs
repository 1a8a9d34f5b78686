use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::features::FeatureSchema;
use crate::logic::model::{AnomalyModel, Scaler, ThresholdStrategy};

/// Location of one persisted artifact, with an optional SHA-256 pin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ArtifactRefRepr")]
pub struct ArtifactRef {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// Accepts `"file.json"` as well as `{"path": "file.json", "sha256": "..."}`
#[derive(Deserialize)]
#[serde(untagged)]
enum ArtifactRefRepr {
    Path(PathBuf),
    Full {
        path: PathBuf,
        #[serde(default)]
        sha256: Option<String>,
    },
}

impl From<ArtifactRefRepr> for ArtifactRef {
    fn from(repr: ArtifactRefRepr) -> Self {
        match repr {
            ArtifactRefRepr::Path(path) => Self { path, sha256: None },
            ArtifactRefRepr::Full { path, sha256 } => Self { path, sha256 },
        }
    }
}

impl ArtifactRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sha256: None,
        }
    }

    pub fn with_sha256(mut self, digest: impl Into<String>) -> Self {
        self.sha256 = Some(digest.into());
        self
    }

    /// Absolute paths are kept, relative ones are joined onto `base`
    pub fn resolve(&self, base: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            base.join(&self.path)
        }
    }
}

impl From<&str> for ArtifactRef {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Where a model's threshold comes from, fixed at registration time
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdSource {
    /// Use the model's built-in classifier
    #[default]
    Native,
    /// Read `{"threshold": ..}` from this file on load
    ConfigFile(ArtifactRef),
}

/// Artifacts registered for one model identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub model: ArtifactRef,
    pub scaler: ArtifactRef,
    #[serde(default)]
    pub threshold: ThresholdSource,
}

impl RegistryEntry {
    pub fn native(model: impl Into<ArtifactRef>, scaler: impl Into<ArtifactRef>) -> Self {
        Self {
            model: model.into(),
            scaler: scaler.into(),
            threshold: ThresholdSource::Native,
        }
    }

    pub fn externally_configured(
        model: impl Into<ArtifactRef>,
        scaler: impl Into<ArtifactRef>,
        config: impl Into<ArtifactRef>,
    ) -> Self {
        Self {
            model: model.into(),
            scaler: scaler.into(),
            threshold: ThresholdSource::ConfigFile(config.into()),
        }
    }
}

/// Loaded, immutable artifacts for one model identifier
#[derive(Debug)]
pub struct ModelBundle {
    pub model_id: String,
    pub model: Box<dyn AnomalyModel>,
    pub scaler: Scaler,
    pub strategy: ThresholdStrategy,
    pub loaded_at: DateTime<Utc>,
}

impl ModelBundle {
    pub fn new(
        model_id: impl Into<String>,
        model: Box<dyn AnomalyModel>,
        scaler: Scaler,
        strategy: ThresholdStrategy,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            model,
            scaler,
            strategy,
            loaded_at: Utc::now(),
        }
    }

    /// Time since the artifacts were read from disk
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.loaded_at)
    }

    /// Feature columns this bundle accepts, in order
    pub fn schema(&self) -> &FeatureSchema {
        self.scaler.schema()
    }
}
