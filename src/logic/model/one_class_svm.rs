//! One-Class SVM (RBF kernel)

use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::inference::AnomalyModel;
use crate::error::ScoringResult;

/// Fitted one-class SVM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneClassSvm {
    pub n_features: usize,
    pub gamma: f64,
    pub support_vectors: Vec<Vec<f64>>,
    pub dual_coef: Vec<f64>,
    pub intercept: f64,
}

impl OneClassSvm {
    pub fn check(&self) -> Result<(), String> {
        if self.n_features == 0 {
            return Err("one-class SVM has no features".to_string());
        }
        if self.support_vectors.is_empty() {
            return Err("one-class SVM has no support vectors".to_string());
        }
        if self.support_vectors.len() != self.dual_coef.len() {
            return Err(format!(
                "{} support vectors but {} dual coefficients",
                self.support_vectors.len(),
                self.dual_coef.len()
            ));
        }
        if self.support_vectors.iter().any(|sv| sv.len() != self.n_features) {
            return Err("support vector width differs from n_features".to_string());
        }
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err("gamma must be positive".to_string());
        }
        if !self.intercept.is_finite() {
            return Err("intercept must be finite".to_string());
        }
        Ok(())
    }

    fn kernel_sum(&self, row: ArrayView1<f64>) -> f64 {
        self.support_vectors
            .iter()
            .zip(&self.dual_coef)
            .map(|(sv, coef)| {
                let dist: f64 = sv.iter().zip(row.iter()).map(|(a, b)| (a - b).powi(2)).sum();
                coef * (-self.gamma * dist).exp()
            })
            .sum()
    }
}

impl AnomalyModel for OneClassSvm {
    fn kind(&self) -> &'static str {
        "one_class_svm"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn decision_function(&self, x: ArrayView2<f64>) -> ScoringResult<Array1<f64>> {
        Ok(x.rows()
            .into_iter()
            .map(|row| self.kernel_sum(row) + self.intercept)
            .collect())
    }

    fn predict(&self, x: ArrayView2<f64>) -> ScoringResult<Array1<i8>> {
        let decision = self.decision_function(x)?;
        Ok(decision.mapv(|d| if d > 0.0 { 1 } else { -1 }))
    }
}
