// Topic analysis pipeline: fetch → normalize → vectorize → classify →
// decode → aggregate.
//
// The only suspending step is the fetch. Inference is CPU-bound and runs
// as one batch on a blocking thread so it doesn't stall the async runtime;
// it only reads the shared classifier, which never changes after load.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::acquisition::traits::{FetchOutcome, TweetSource};
use crate::error::AnalysisError;
use crate::model::traits::EmotionClassifier;
use crate::scoring::aggregate::{aggregate, PredictionResult};
use crate::text::normalize::TextNormalizer;

/// A completed analysis for one topic.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub topic: String,
    /// Texts returned by acquisition, including any that normalized to empty.
    pub total_tweets: usize,
    pub result: PredictionResult,
}

/// Orchestrates acquisition and inference for a topic.
pub struct PredictionService {
    source: Arc<dyn TweetSource>,
    classifier: Arc<dyn EmotionClassifier>,
    normalizer: Arc<TextNormalizer>,
    tweet_count: usize,
}

impl PredictionService {
    pub fn new(
        source: Arc<dyn TweetSource>,
        classifier: Arc<dyn EmotionClassifier>,
        tweet_count: usize,
    ) -> Self {
        Self {
            source,
            classifier,
            normalizer: Arc::new(TextNormalizer::new()),
            tweet_count,
        }
    }

    /// Analyze `topic` with the configured tweet count.
    pub async fn analyze(&self, topic: &str) -> Result<Analysis, AnalysisError> {
        self.analyze_with_count(topic, self.tweet_count).await
    }

    /// Analyze `topic`, requesting `count` tweets from the source.
    pub async fn analyze_with_count(
        &self,
        topic: &str,
        count: usize,
    ) -> Result<Analysis, AnalysisError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(AnalysisError::InvalidTopic);
        }

        let texts = match self.source.fetch(topic, count).await {
            FetchOutcome::Tweets(texts) => texts,
            FetchOutcome::NoData => {
                warn!(topic, "No tweets available for topic");
                return Err(AnalysisError::NoTweetsFound);
            }
        };
        let total_tweets = texts.len();

        let classifier = Arc::clone(&self.classifier);
        let normalizer = Arc::clone(&self.normalizer);
        let result = tokio::task::spawn_blocking(move || {
            classify_texts(&normalizer, classifier.as_ref(), &texts)
        })
        .await
        .map_err(|e| AnalysisError::Unexpected(format!("inference task failed: {e}")))??;

        info!(
            topic,
            total_tweets,
            classified = result.total_classified,
            dominant = %result.dominant_emotion,
            "Analysis complete"
        );

        Ok(Analysis {
            topic: topic.to_string(),
            total_tweets,
            result,
        })
    }
}

/// Run the synchronous half of the pipeline over already-fetched texts.
///
/// Texts that normalize to nothing are dropped; if that leaves none the
/// corpus is reported empty rather than classified.
fn classify_texts(
    normalizer: &TextNormalizer,
    classifier: &dyn EmotionClassifier,
    texts: &[String],
) -> Result<PredictionResult, AnalysisError> {
    let normalized: Vec<String> = normalizer
        .normalize_all(texts)
        .into_iter()
        .filter(|t| !t.is_empty())
        .collect();

    if normalized.is_empty() {
        return Err(AnalysisError::EmptyCorpus);
    }

    let dropped = texts.len() - normalized.len();
    if dropped > 0 {
        debug!(dropped, kept = normalized.len(), "Dropped texts with no usable tokens");
    }

    let labels = classifier.classify(&normalized)?;
    aggregate(&labels)
}
