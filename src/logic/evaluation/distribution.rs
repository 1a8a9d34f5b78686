//! Score distribution summary
//!
//! Histogram (bins rounded to 0.001), empirical CDF and anomaly rate over
//! a batch of scores, for reporting alongside the metrics. The share of
//! predicted anomalies also yields a coarse stability verdict.

use std::collections::BTreeMap;

use serde::Serialize;

use super::report::MetricsReport;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub bin: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EcdfPoint {
    pub score: f64,
    pub cumulative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreDistribution {
    pub histogram: Vec<HistogramBin>,
    pub ecdf: Vec<EcdfPoint>,
    /// Percent of scores below the threshold, when one is known
    pub anomaly_rate: Option<f64>,
}

impl ScoreDistribution {
    pub fn from_scores(scores: &[f64], threshold: Option<f64>) -> Self {
        let mut sorted = scores.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();

        let mut bins: BTreeMap<i64, usize> = BTreeMap::new();
        for score in &sorted {
            *bins.entry((score * 1000.0).round() as i64).or_insert(0) += 1;
        }
        let histogram = bins
            .into_iter()
            .map(|(key, count)| HistogramBin {
                bin: key as f64 / 1000.0,
                count,
            })
            .collect();

        let ecdf = sorted
            .iter()
            .enumerate()
            .map(|(i, &score)| EcdfPoint {
                score,
                cumulative: (i + 1) as f64 / n as f64,
            })
            .collect();

        let anomaly_rate = match threshold {
            Some(t) if n > 0 => {
                let below = sorted.iter().filter(|&&s| s < t).count();
                Some(below as f64 / n as f64 * 100.0)
            }
            _ => None,
        };

        Self {
            histogram,
            ecdf,
            anomaly_rate,
        }
    }
}

/// Stability verdict from the share of records predicted anomalous
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stability {
    /// More than 30% anomalies
    Unstable,
    /// More than 10% anomalies
    PartiallyUnstable,
    MostlyStable,
}

impl Stability {
    pub fn from_rate(percent: f64) -> Self {
        if percent > 30.0 {
            Stability::Unstable
        } else if percent > 10.0 {
            Stability::PartiallyUnstable
        } else {
            Stability::MostlyStable
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            Stability::Unstable => "Network is unstable and requires immediate attention.",
            Stability::PartiallyUnstable => "Network shows partially unstable behavior.",
            Stability::MostlyStable => "Network appears mostly stable.",
        }
    }
}

/// Percent of predictions equal to 1; 0 for an empty batch
pub fn predicted_anomaly_rate(predictions: &[u8]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let anomalies = predictions.iter().filter(|&&p| p == 1).count();
    (anomalies * 100) as f64 / predictions.len() as f64
}

/// One-line human summary of a metrics report
pub fn summary_line(report: &MetricsReport) -> String {
    format!(
        "The model achieved an F1-score of {:.2}%. Recall was {:.2}%, and precision was {:.2}%.",
        report.f1_score * 100.0,
        report.recall * 100.0,
        report.precision * 100.0
    )
}
