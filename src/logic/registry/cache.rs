//! Opt-in bundle cache
//!
//! Bundles are immutable once loaded, so sharing them behind `Arc`
//! needs only a read-mostly lock around the map.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::types::ModelBundle;

#[derive(Debug, Default)]
pub struct ArtifactCache {
    bundles: RwLock<HashMap<String, Arc<ModelBundle>>>,
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, model_id: &str) -> Option<Arc<ModelBundle>> {
        self.bundles.read().get(model_id).cloned()
    }

    /// Store `bundle`, keeping an existing entry if another request won the race
    pub fn insert(&self, bundle: Arc<ModelBundle>) -> Arc<ModelBundle> {
        let mut bundles = self.bundles.write();
        bundles
            .entry(bundle.model_id.clone())
            .or_insert(bundle)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.bundles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.read().is_empty()
    }

    pub fn clear(&self) {
        self.bundles.write().clear();
        log::info!("Artifact cache cleared");
    }
}
