// Frozen TF-IDF vectorizer.
//
// Vocabulary and IDF weights come from the training pipeline's export and
// are never refit here. Rows are sparse: only columns with non-zero weight
// are stored, sorted by column index.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tokens shorter than this were never part of the training vocabulary.
const MIN_TOKEN_CHARS: usize = 2;

/// One sparse feature row: `(column, weight)` pairs in ascending column order.
pub type SparseRow = Vec<(usize, f64)>;

/// A batch of vectorized texts, one row per input text.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    n_features: usize,
    rows: Vec<SparseRow>,
}

impl FeatureMatrix {
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }
}

fn default_normalize() -> bool {
    true
}

/// Term-weighting model exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    /// Term to column index.
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column.
    pub idf: Vec<f64>,
    /// L2-normalize each row (the training default).
    #[serde(default = "default_normalize")]
    pub normalize: bool,
}

impl TfIdfVectorizer {
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Check that every vocabulary entry points at an IDF column.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.idf.is_empty() {
            return Err(ConfigError::Mismatch(
                "vectorizer has no feature columns".to_string(),
            ));
        }
        let out_of_range = self
            .vocabulary
            .iter()
            .find(|(_, col)| **col >= self.idf.len());
        if let Some((term, col)) = out_of_range {
            return Err(ConfigError::Mismatch(format!(
                "vocabulary term '{term}' maps to column {col} but only {} idf weights exist",
                self.idf.len()
            )));
        }
        Ok(())
    }

    /// Vectorize a batch of normalized texts. Unknown tokens are ignored.
    pub fn transform<S: AsRef<str>>(&self, texts: &[S]) -> FeatureMatrix {
        let rows = texts.iter().map(|t| self.transform_one(t.as_ref())).collect();
        FeatureMatrix {
            n_features: self.n_features(),
            rows,
        }
    }

    fn transform_one(&self, text: &str) -> SparseRow {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in text.split_whitespace() {
            if token.chars().count() < MIN_TOKEN_CHARS {
                continue;
            }
            if let Some(&col) = self.vocabulary.get(token) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut row: SparseRow = counts
            .into_iter()
            .filter_map(|(col, tf)| {
                let weight = tf * self.idf.get(col).copied().unwrap_or(0.0);
                (weight != 0.0).then_some((col, weight))
            })
            .collect();

        if self.normalize {
            let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, w) in &mut row {
                    *w /= norm;
                }
            }
        }

        row
    }
}
