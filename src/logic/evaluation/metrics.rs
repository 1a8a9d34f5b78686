//! Binary confusion matrix and the scalar metrics derived from it.
//!
//! Class 1 (anomaly) is the positive class. Ratios whose denominator is
//! zero are reported as 0.0.

use serde::Serialize;

use crate::error::{ScoringError, ScoringResult};

/// Counts over the fixed class order `{0, 1}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConfusionMatrix {
    pub tn: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
    pub tp: usize,
}

impl ConfusionMatrix {
    /// Tally (actual, predicted) pairs. Both sides must be 0 or 1.
    pub fn from_labels(actual: &[u8], predicted: &[u8]) -> ScoringResult<Self> {
        if actual.len() != predicted.len() {
            return Err(ScoringError::invalid_table(format!(
                "actual length {} != predicted length {}",
                actual.len(),
                predicted.len()
            )));
        }

        let mut cm = Self::default();
        for (row, (&a, &p)) in actual.iter().zip(predicted).enumerate() {
            match (a, p) {
                (0, 0) => cm.tn += 1,
                (0, 1) => cm.fp += 1,
                (1, 0) => cm.fn_ += 1,
                (1, 1) => cm.tp += 1,
                (0 | 1, other) => {
                    return Err(ScoringError::invalid_table(format!(
                        "prediction {} at row {} is not 0 or 1",
                        other,
                        row + 1
                    )))
                }
                (other, _) => {
                    return Err(ScoringError::MalformedLabel {
                        row: row + 1,
                        value: other.to_string(),
                    })
                }
            }
        }
        Ok(cm)
    }

    /// `[tn, fp, fn, tp]`
    pub fn to_array(&self) -> [usize; 4] {
        [self.tn, self.fp, self.fn_, self.tp]
    }

    pub fn total(&self) -> usize {
        self.tn + self.fp + self.fn_ + self.tp
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.tn + self.tp, self.total())
    }

    /// `TP / (TP + FP)`
    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    /// `TP / (TP + FN)`
    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    /// `2TP / (2TP + FP + FN)`, the harmonic mean of precision and recall
    pub fn f1(&self) -> f64 {
        ratio(2 * self.tp, 2 * self.tp + self.fp + self.fn_)
    }
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}
