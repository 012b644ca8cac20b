// Result aggregation: per-emotion counts, percentages and the dominant label.
//
// Every canonical label is present in the output maps even at zero, and the
// maps iterate (and serialize) in canonical order because EmotionLabel's Ord
// is the declaration order.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::emotion::EmotionLabel;
use crate::error::AnalysisError;

/// Summary statistics over the classified texts for one topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub emotion_counts: BTreeMap<EmotionLabel, u32>,
    pub emotion_percentages: BTreeMap<EmotionLabel, f64>,
    pub dominant_emotion: EmotionLabel,
    /// Number of texts that reached the classifier (sum of all counts).
    pub total_classified: u32,
}

impl PredictionResult {
    pub fn count(&self, label: EmotionLabel) -> u32 {
        self.emotion_counts.get(&label).copied().unwrap_or(0)
    }

    pub fn percentage(&self, label: EmotionLabel) -> f64 {
        self.emotion_percentages.get(&label).copied().unwrap_or(0.0)
    }
}

/// Tally decoded labels. Callers must not pass an empty slice; if one does,
/// it is reported as an empty corpus.
pub fn aggregate(labels: &[EmotionLabel]) -> Result<PredictionResult, AnalysisError> {
    if labels.is_empty() {
        return Err(AnalysisError::EmptyCorpus);
    }

    let mut emotion_counts: BTreeMap<EmotionLabel, u32> =
        EmotionLabel::ALL.iter().map(|&e| (e, 0)).collect();
    for label in labels {
        *emotion_counts.entry(*label).or_insert(0) += 1;
    }

    let total = labels.len() as u32;
    let emotion_percentages = emotion_counts
        .iter()
        .map(|(&e, &count)| (e, count as f64 / total as f64 * 100.0))
        .collect();

    Ok(PredictionResult {
        dominant_emotion: dominant(&emotion_counts),
        emotion_counts,
        emotion_percentages,
        total_classified: total,
    })
}

/// Highest count wins; on a tie the label listed first in canonical order wins.
fn dominant(counts: &BTreeMap<EmotionLabel, u32>) -> EmotionLabel {
    let count_of = |e: &EmotionLabel| counts.get(e).copied().unwrap_or(0);
    EmotionLabel::ALL
        .iter()
        .copied()
        .fold(EmotionLabel::ALL[0], |best, e| {
            if count_of(&e) > count_of(&best) {
                e
            } else {
                best
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_label() {
        let result = aggregate(&[EmotionLabel::Fear]).unwrap();
        assert_eq!(result.dominant_emotion, EmotionLabel::Fear);
        assert_eq!(result.count(EmotionLabel::Fear), 1);
        assert!((result.percentage(EmotionLabel::Fear) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(aggregate(&[]), Err(AnalysisError::EmptyCorpus)));
    }
}
