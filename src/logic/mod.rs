//! Logic Module - Scoring & Evaluation Engines
//!
//! ## Layout
//! - `registry/` - Model identifier → artifacts, loading and optional cache
//! - `features/` - CSV table parsing and feature preparation
//! - `model/` - Scalers, model families and threshold strategies
//! - `evaluation/` - Metrics, ROC-AUC, breakdown and score distribution
//! - `response` - Scored table and wire payload
//! - `pipeline` - Orchestration of one scoring run

pub mod config;
pub mod registry;

// Stages
pub mod features;
pub mod model;
pub mod evaluation;
pub mod response;
pub mod pipeline;
