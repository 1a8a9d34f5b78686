//! Features Module - Table parsing and feature preparation
//!
//! Turns an uploaded CSV buffer into the feature matrix a model expects.
//! The per-model schema lives in `layout`; nothing here knows about scalers.

pub mod layout;
pub mod prepare;
pub mod table;

// Re-export common types
pub use layout::FeatureSchema;
pub use prepare::{prepare_features, PreparedFeatures};
pub use table::{Cell, RecordTable};
