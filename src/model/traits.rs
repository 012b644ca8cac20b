// EmotionClassifier trait: the inference seam PredictionService calls into.

use crate::emotion::EmotionLabel;
use crate::error::ConfigError;

/// Anything that can label a batch of already-normalized texts.
///
/// Implementations must be synchronous and CPU-bound; the service runs them
/// on a blocking thread. One label per input text, in input order.
pub trait EmotionClassifier: Send + Sync {
    fn classify(&self, normalized: &[String]) -> Result<Vec<EmotionLabel>, ConfigError>;
}
