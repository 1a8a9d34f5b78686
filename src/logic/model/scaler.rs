//! Fitted Feature Scalers
//!
//! Parameters come from training and are applied unchanged here.
//! Both scalers carry the ordered feature names they were fitted on.

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{ScoringError, ScoringResult};
use crate::logic::features::FeatureSchema;

/// Fitted scaler parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// `x' = (x - mean) / scale`; either step may be disabled
    Standard {
        feature_names: FeatureSchema,
        #[serde(default)]
        mean: Option<Vec<f64>>,
        #[serde(default)]
        scale: Option<Vec<f64>>,
    },
    /// `x' = x * scale + min` (fitted `min_` / `scale_`)
    MinMax {
        feature_names: FeatureSchema,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

impl Scaler {
    /// Feature schema the scaler was fitted on
    pub fn schema(&self) -> &FeatureSchema {
        match self {
            Scaler::Standard { feature_names, .. } => feature_names,
            Scaler::MinMax { feature_names, .. } => feature_names,
        }
    }

    pub fn n_features(&self) -> usize {
        self.schema().len()
    }

    /// Check parameter vectors against the schema
    pub fn check(&self) -> Result<(), String> {
        let n = self.n_features();
        if n == 0 {
            return Err("scaler has no features".to_string());
        }

        let params: Vec<(&str, &Vec<f64>)> = match self {
            Scaler::Standard { mean, scale, .. } => {
                let mut p = Vec::new();
                if let Some(m) = mean {
                    p.push(("mean", m));
                }
                if let Some(s) = scale {
                    p.push(("scale", s));
                }
                p
            }
            Scaler::MinMax { min, scale, .. } => vec![("min", min), ("scale", scale)],
        };

        for (name, values) in params {
            if values.len() != n {
                return Err(format!("{} has {} values, schema has {}", name, values.len(), n));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(format!("{} contains non-finite values", name));
            }
        }

        if let Scaler::Standard { scale: Some(s), .. } = self {
            if s.iter().any(|v| *v == 0.0) {
                return Err("scale contains zeros".to_string());
            }
        }

        Ok(())
    }

    /// Apply the fitted transform
    pub fn transform(&self, x: ArrayView2<f64>) -> ScoringResult<Array2<f64>> {
        if x.ncols() != self.n_features() {
            return Err(ScoringError::invalid_table(format!(
                "scaler fitted on {} features ({}), got {} columns",
                self.n_features(),
                self.schema().names().join(", "),
                x.ncols()
            )));
        }

        let mut out = x.to_owned();
        match self {
            Scaler::Standard { mean, scale, .. } => {
                if let Some(m) = mean {
                    out -= &ArrayView1::from(m.as_slice());
                }
                if let Some(s) = scale {
                    out /= &ArrayView1::from(s.as_slice());
                }
            }
            Scaler::MinMax { min, scale, .. } => {
                out *= &ArrayView1::from(scale.as_slice());
                out += &ArrayView1::from(min.as_slice());
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn standard() -> Scaler {
        Scaler::Standard {
            feature_names: FeatureSchema::new(["a", "b"]),
            mean: Some(vec![1.0, 10.0]),
            scale: Some(vec![2.0, 5.0]),
        }
    }

    #[test]
    fn test_standard_transform() {
        let x = array![[3.0, 20.0], [1.0, 0.0]];
        let out = standard().transform(x.view()).unwrap();
        assert_eq!(out, array![[1.0, 2.0], [0.0, -2.0]]);
    }

    #[test]
    fn test_standard_without_mean() {
        let scaler = Scaler::Standard {
            feature_names: FeatureSchema::new(["a"]),
            mean: None,
            scale: Some(vec![4.0]),
        };
        let out = scaler.transform(array![[2.0]].view()).unwrap();
        assert_eq!(out, array![[0.5]]);
    }

    #[test]
    fn test_min_max_transform() {
        let scaler = Scaler::MinMax {
            feature_names: FeatureSchema::new(["a", "b"]),
            min: vec![0.0, -5.0],
            scale: vec![0.5, 0.5],
        };
        let out = scaler.transform(array![[4.0, 10.0]].view()).unwrap();
        assert_eq!(out, array![[2.0, 0.0]]);
    }

    #[test]
    fn test_column_count_mismatch() {
        let result = standard().transform(array![[1.0, 2.0, 3.0]].view());
        assert!(matches!(result, Err(ScoringError::InvalidTable(_))));
    }

    #[test]
    fn test_check_rejects_bad_params() {
        let scaler = Scaler::Standard {
            feature_names: FeatureSchema::new(["a", "b"]),
            mean: Some(vec![0.0]),
            scale: None,
        };
        assert!(scaler.check().is_err());

        let zero = Scaler::Standard {
            feature_names: FeatureSchema::new(["a"]),
            mean: None,
            scale: Some(vec![0.0]),
        };
        assert!(zero.check().is_err());
        assert!(standard().check().is_ok());
    }

    #[test]
    fn test_deserialize_tagged() {
        let json = r#"{"kind":"min_max","feature_names":["a"],"min":[0.0],"scale":[1.0]}"#;
        let scaler: Scaler = serde_json::from_str(json).unwrap();
        assert_eq!(scaler.n_features(), 1);
        assert!(matches!(scaler, Scaler::MinMax { .. }));
    }
}
