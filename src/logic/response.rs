//! Response Assembler
//!
//! Joins scores and predictions back onto the uploaded table and packages
//! the wire response. Column order is preserved; `anomaly_score` and
//! `prediction` are appended (or overwritten in place if the upload
//! already had columns with those names).

use std::io;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::constants::{PREDICTION_COLUMN, SCORE_COLUMN};
use crate::error::{ScoringError, ScoringResult};
use crate::logic::evaluation::MetricsReport;
use crate::logic::features::{Cell, RecordTable};

// ============================================================================
// SCORED TABLE
// ============================================================================

/// Original table plus one score and prediction per row
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTable {
    table: RecordTable,
    scores: Vec<f64>,
    predictions: Vec<u8>,
}

/// Where an output column's value comes from
enum Slot {
    Original(usize),
    Score,
    Prediction,
}

impl ScoredTable {
    pub fn new(table: RecordTable, scores: Vec<f64>, predictions: Vec<u8>) -> ScoringResult<Self> {
        if scores.len() != table.len() || predictions.len() != table.len() {
            return Err(ScoringError::invalid_table(format!(
                "{} rows but {} scores and {} predictions",
                table.len(),
                scores.len(),
                predictions.len()
            )));
        }
        Ok(Self {
            table,
            scores,
            predictions,
        })
    }

    pub fn table(&self) -> &RecordTable {
        &self.table
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn predictions(&self) -> &[u8] {
        &self.predictions
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn anomaly_count(&self) -> usize {
        self.predictions.iter().filter(|&&p| p == 1).count()
    }

    /// Output columns in order
    pub fn columns(&self) -> Vec<&str> {
        self.slots()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }

    fn slots(&self) -> Vec<(&str, Slot)> {
        let mut slots: Vec<(&str, Slot)> = self
            .table
            .columns()
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let slot = match name.as_str() {
                    SCORE_COLUMN => Slot::Score,
                    PREDICTION_COLUMN => Slot::Prediction,
                    _ => Slot::Original(i),
                };
                (name.as_str(), slot)
            })
            .collect();

        if !self.table.has_column(SCORE_COLUMN) {
            slots.push((SCORE_COLUMN, Slot::Score));
        }
        if !self.table.has_column(PREDICTION_COLUMN) {
            slots.push((PREDICTION_COLUMN, Slot::Prediction));
        }
        slots
    }

    /// Write the scored table as CSV with a header row
    pub fn write_csv<W: io::Write>(&self, writer: W) -> ScoringResult<()> {
        let mut out = csv::Writer::from_writer(writer);
        let slots = self.slots();

        out.write_record(slots.iter().map(|(name, _)| *name))?;

        for (r, row) in self.table.rows().iter().enumerate() {
            let fields: Vec<String> = slots
                .iter()
                .map(|(_, slot)| match slot {
                    Slot::Original(i) => row[*i].to_field(),
                    Slot::Score => self.scores[r].to_string(),
                    Slot::Prediction => self.predictions[r].to_string(),
                })
                .collect();
            out.write_record(&fields)?;
        }

        out.flush()
            .map_err(|e| ScoringError::invalid_table(format!("failed to write CSV: {}", e)))?;
        Ok(())
    }
}

/// One output record, borrowed from the scored table
struct RecordView<'a> {
    slots: &'a [(&'a str, Slot)],
    cells: &'a [Cell],
    score: f64,
    prediction: u8,
}

impl Serialize for RecordView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (name, slot) in self.slots {
            match slot {
                Slot::Original(i) => map.serialize_entry(name, &self.cells[*i])?,
                Slot::Score => map.serialize_entry(name, &self.score)?,
                Slot::Prediction => map.serialize_entry(name, &self.prediction)?,
            }
        }
        map.end()
    }
}

impl Serialize for ScoredTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let slots = self.slots();
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for (r, cells) in self.table.rows().iter().enumerate() {
            seq.serialize_element(&RecordView {
                slots: &slots,
                cells,
                score: self.scores[r],
                prediction: self.predictions[r],
            })?;
        }
        seq.end()
    }
}

// ============================================================================
// RESPONSE
// ============================================================================

/// Result of one successful pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringOutcome {
    pub data: ScoredTable,
    /// Serialized as `{}` when the upload had no labels
    #[serde(serialize_with = "metrics_or_empty")]
    pub metrics: Option<MetricsReport>,
}

fn metrics_or_empty<S: Serializer>(metrics: &Option<MetricsReport>, serializer: S) -> Result<S::Ok, S::Error> {
    match metrics {
        Some(report) => report.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

/// Payload returned across the request boundary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScoreResponse {
    Scored(ScoringOutcome),
    Error { error: String },
}

impl ScoreResponse {
    pub fn error(message: impl Into<String>) -> Self {
        ScoreResponse::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ScoreResponse::Error { .. })
    }
}

impl From<ScoringOutcome> for ScoreResponse {
    fn from(outcome: ScoringOutcome) -> Self {
        ScoreResponse::Scored(outcome)
    }
}
