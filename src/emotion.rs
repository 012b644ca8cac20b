// Emotion labels: the fixed output vocabulary of the classifier.
//
// Declaration order is the canonical order. It decides ties for the
// dominant emotion and the key order of every per-emotion map, so the
// derived Ord must stay in sync with ALL.

use serde::{Deserialize, Serialize};

/// One of the eight emotion categories a text can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Joy,
    Sadness,
    Fear,
    Anger,
    Surprise,
    Neutral,
    Disgust,
    Shame,
}

impl EmotionLabel {
    /// Every label, in canonical order.
    pub const ALL: [EmotionLabel; 8] = [
        EmotionLabel::Joy,
        EmotionLabel::Sadness,
        EmotionLabel::Fear,
        EmotionLabel::Anger,
        EmotionLabel::Surprise,
        EmotionLabel::Neutral,
        EmotionLabel::Disgust,
        EmotionLabel::Shame,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Joy => "joy",
            EmotionLabel::Sadness => "sadness",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Anger => "anger",
            EmotionLabel::Surprise => "surprise",
            EmotionLabel::Neutral => "neutral",
            EmotionLabel::Disgust => "disgust",
            EmotionLabel::Shame => "shame",
        }
    }
}

impl std::fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_sorted_by_ord() {
        let mut sorted = EmotionLabel::ALL;
        sorted.sort();
        assert_eq!(sorted, EmotionLabel::ALL);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        for label in EmotionLabel::ALL {
            let json = serde_json::to_string(&label).unwrap();
            assert_eq!(json, format!("\"{}\"", label.as_str()));
            let back: EmotionLabel = serde_json::from_str(&json).unwrap();
            assert_eq!(back, label);
        }
    }

    #[test]
    fn test_unknown_label_rejected() {
        assert!(serde_json::from_str::<EmotionLabel>("\"boredom\"").is_err());
    }
}
