//! Configuration module

use std::path::PathBuf;

use crate::constants;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory that relative artifact paths resolve against
    pub artifact_dir: PathBuf,

    /// Optional JSON registry file replacing the built-in model table
    pub registry_path: Option<PathBuf>,

    /// Keep loaded bundles in memory between requests
    pub cache_artifacts: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from(constants::DEFAULT_ARTIFACT_DIR),
            registry_path: None,
            cache_artifacts: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            artifact_dir: PathBuf::from(constants::get_artifact_dir()),
            registry_path: constants::get_registry_path().map(PathBuf::from),
            cache_artifacts: constants::is_artifact_cache_enabled(),
        }
    }

    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    pub fn with_registry_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.registry_path = Some(path.into());
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_artifacts = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.artifact_dir, PathBuf::from("artifacts"));
        assert!(config.registry_path.is_none());
        assert!(!config.cache_artifacts);
    }

    #[test]
    fn test_builder_overrides() {
        let config = AppConfig::default()
            .with_artifact_dir("/srv/models")
            .with_registry_path("/srv/registry.json")
            .with_cache(true);
        assert_eq!(config.artifact_dir, PathBuf::from("/srv/models"));
        assert_eq!(config.registry_path, Some(PathBuf::from("/srv/registry.json")));
        assert!(config.cache_artifacts);
    }
}
