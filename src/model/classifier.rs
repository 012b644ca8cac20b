// Frozen linear classifier (one-vs-rest weights plus intercepts).
//
// score_k = w_k · x + b_k, prediction = argmax_k score_k. A model exported
// with a single weight row is binary: class 1 when the score is positive.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::vectorizer::{FeatureMatrix, SparseRow};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    /// One weight row per class (or a single row for a binary model).
    pub coef: Vec<Vec<f64>>,
    /// One intercept per weight row.
    pub intercept: Vec<f64>,
}

impl LinearClassifier {
    pub fn n_features(&self) -> usize {
        self.coef.first().map(Vec::len).unwrap_or(0)
    }

    /// Number of distinct codes `predict` can return.
    pub fn n_classes(&self) -> usize {
        if self.coef.len() == 1 {
            2
        } else {
            self.coef.len()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.coef.is_empty() {
            return Err(ConfigError::Mismatch("classifier has no weight rows".to_string()));
        }
        if self.intercept.len() != self.coef.len() {
            return Err(ConfigError::Mismatch(format!(
                "classifier has {} weight rows but {} intercepts",
                self.coef.len(),
                self.intercept.len()
            )));
        }
        let width = self.n_features();
        if let Some(row) = self.coef.iter().position(|r| r.len() != width) {
            return Err(ConfigError::Mismatch(format!(
                "classifier weight row {row} has {} columns, expected {width}",
                self.coef[row].len()
            )));
        }
        Ok(())
    }

    /// Raw per-row scores for one feature row.
    pub fn decision_function(&self, row: &SparseRow) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(weights, bias)| {
                row.iter()
                    .map(|&(col, x)| weights.get(col).copied().unwrap_or(0.0) * x)
                    .sum::<f64>()
                    + bias
            })
            .collect()
    }

    /// Predict one class code per matrix row.
    pub fn predict(&self, matrix: &FeatureMatrix) -> Vec<usize> {
        matrix
            .rows()
            .iter()
            .map(|row| {
                let scores = self.decision_function(row);
                if scores.len() == 1 {
                    usize::from(scores[0] > 0.0)
                } else {
                    argmax(&scores)
                }
            })
            .collect()
    }
}

/// Index of the largest score; the earliest index wins ties.
fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = i;
        }
    }
    best
}
