//! Feature Layout - Per-model Feature Schema
//!
//! **This type controls which columns a model accepts**
//!
//! Every scaler is fitted on an ordered list of feature names. Incoming
//! tables must present exactly those columns, in exactly that order,
//! once the label column has been removed.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::{ScoringError, ScoringResult};

// ============================================================================
// FEATURE SCHEMA
// ============================================================================

/// Ordered feature names a fitted scaler was trained on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Get feature index by name (O(n) but features are few)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// CRC32 of the ordered names, used to identify a layout in logs
    pub fn layout_hash(&self) -> u32 {
        compute_layout_hash(&self.names)
    }

    /// Check that `columns` match this schema name-for-name
    pub fn validate(&self, columns: &[String]) -> ScoringResult<()> {
        if columns != self.names.as_slice() {
            return Err(ScoringError::SchemaMismatch {
                expected: self.names.clone(),
                actual: columns.to_vec(),
                expected_hash: self.layout_hash(),
                actual_hash: compute_layout_hash(columns),
            });
        }
        Ok(())
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of an ordered column list
pub fn compute_layout_hash(names: &[String]) -> u32 {
    let mut hasher = Hasher::new();

    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// TESTS
// ============================================================================
