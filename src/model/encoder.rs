// Label encoder: classifier code → emotion label.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::emotion::EmotionLabel;
use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    /// `classes[code]` is the label for classifier output `code`.
    pub classes: Vec<EmotionLabel>,
}

impl LabelEncoder {
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.classes.is_empty() {
            return Err(ConfigError::Mismatch("label encoder has no classes".to_string()));
        }
        let unique: HashSet<_> = self.classes.iter().collect();
        if unique.len() != self.classes.len() {
            return Err(ConfigError::Mismatch(
                "label encoder lists a class more than once".to_string(),
            ));
        }
        Ok(())
    }

    /// Map codes back to labels. Any unknown code means the classifier and
    /// encoder were not exported together.
    pub fn decode(&self, codes: &[usize]) -> Result<Vec<EmotionLabel>, ConfigError> {
        codes
            .iter()
            .map(|&code| {
                self.classes.get(code).copied().ok_or(ConfigError::UnknownCode {
                    code,
                    classes: self.classes.len(),
                })
            })
            .collect()
    }
}
