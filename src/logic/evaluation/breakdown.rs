//! Per-record correctness breakdown

use serde::{Serialize, Serializer};

/// Whether a prediction matched the label; serialized as a check or cross mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correctness(pub bool);

impl Correctness {
    pub fn symbol(&self) -> &'static str {
        if self.0 {
            "✔"
        } else {
            "✘"
        }
    }
}

impl Serialize for Correctness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionOutcome {
    /// 1-based row number
    pub index: usize,
    pub actual: u8,
    pub prediction: u8,
    pub correct: Correctness,
}

pub fn prediction_breakdown(actual: &[u8], predicted: &[u8]) -> Vec<PredictionOutcome> {
    actual
        .iter()
        .zip(predicted)
        .enumerate()
        .map(|(i, (&a, &p))| PredictionOutcome {
            index: i + 1,
            actual: a,
            prediction: p,
            correct: Correctness(a == p),
        })
        .collect()
}
