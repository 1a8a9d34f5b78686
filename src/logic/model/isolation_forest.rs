//! Isolation Forest
//!
//! Scores rows by how quickly random axis-aligned splits isolate them.
//! Trees are fitted offline; only traversal happens here.

use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::inference::AnomalyModel;
use crate::error::ScoringResult;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Fitted forest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    pub n_features: usize,
    /// Sub-sample size each tree was grown on
    pub max_samples: usize,
    /// Subtracted from raw scores so the native boundary sits at zero
    pub offset: f64,
    pub trees: Vec<IsolationTree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationTree {
    /// Column subset the tree was grown on; split indices refer into it
    #[serde(default)]
    pub features: Option<Vec<usize>>,
    /// Node 0 is the root
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        n_samples: usize,
    },
}

/// Average path length of an unsuccessful BST search over `n` points
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

impl IsolationTree {
    fn column(&self, feature: usize) -> Option<usize> {
        match &self.features {
            Some(subset) => subset.get(feature).copied(),
            None => Some(feature),
        }
    }

    fn check(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        if let Some(subset) = &self.features {
            if subset.iter().any(|&f| f >= n_features) {
                return Err("tree feature subset out of range".to_string());
            }
        }
        for (id, node) in self.nodes.iter().enumerate() {
            if let Node::Split { feature, threshold, left, right } = node {
                // Children must come after their parent, which rules out cycles
                if *left <= id || *right <= id || *left >= self.nodes.len() || *right >= self.nodes.len() {
                    return Err(format!("node {} has invalid children", id));
                }
                match self.column(*feature) {
                    Some(col) if col < n_features => {}
                    _ => return Err(format!("node {} splits on unknown feature {}", id, feature)),
                }
                if threshold.is_nan() {
                    return Err(format!("node {} has NaN threshold", id));
                }
            }
        }
        Ok(())
    }

    /// Depth of the leaf `row` lands in, plus the expected remaining depth
    fn path_length(&self, row: ArrayView1<f64>) -> f64 {
        let mut id = 0;
        let mut depth = 0.0;
        loop {
            match &self.nodes[id] {
                Node::Split { feature, threshold, left, right } => {
                    let col = self.column(*feature).unwrap_or(*feature);
                    id = if row[col] <= *threshold { *left } else { *right };
                    depth += 1.0;
                }
                Node::Leaf { n_samples } => return depth + average_path_length(*n_samples),
            }
        }
    }
}

impl IsolationForest {
    pub fn check(&self) -> Result<(), String> {
        if self.n_features == 0 {
            return Err("isolation forest has no features".to_string());
        }
        if self.trees.is_empty() {
            return Err("isolation forest has no trees".to_string());
        }
        if self.max_samples == 0 {
            return Err("max_samples must be positive".to_string());
        }
        if !self.offset.is_finite() {
            return Err("offset must be finite".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(self.n_features)
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }

    /// Raw score in `[-1, 0]`; lower means easier to isolate
    pub fn score_samples(&self, x: ArrayView2<f64>) -> Array1<f64> {
        let denominator = self.trees.len() as f64 * average_path_length(self.max_samples);

        x.rows()
            .into_iter()
            .map(|row| {
                let depths: f64 = self.trees.iter().map(|t| t.path_length(row)).sum();
                let ratio = if denominator != 0.0 { depths / denominator } else { 1.0 };
                -(2f64.powf(-ratio))
            })
            .collect()
    }
}

impl AnomalyModel for IsolationForest {
    fn kind(&self) -> &'static str {
        "isolation_forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn decision_function(&self, x: ArrayView2<f64>) -> ScoringResult<Array1<f64>> {
        Ok(self.score_samples(x) - self.offset)
    }

    fn predict(&self, x: ArrayView2<f64>) -> ScoringResult<Array1<i8>> {
        let decision = self.decision_function(x)?;
        Ok(decision.mapv(|d| if d < 0.0 { -1 } else { 1 }))
    }
}
