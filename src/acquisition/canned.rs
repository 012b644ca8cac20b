// In-memory TweetSource returning a fixed outcome. No processes, no files.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::debug;

use super::traits::{FetchOutcome, TweetSource};

/// Source that answers every fetch with the same outcome and counts calls.
pub struct CannedSource {
    outcome: FetchOutcome,
    calls: AtomicUsize,
}

impl CannedSource {
    pub fn new(outcome: FetchOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_tweets<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(FetchOutcome::from_texts(
            texts.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn no_data() -> Self {
        Self::new(FetchOutcome::NoData)
    }

    /// How many times `fetch` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TweetSource for CannedSource {
    async fn fetch(&self, topic: &str, count: usize) -> FetchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!(topic, count, "Returning canned fetch outcome");
        match &self.outcome {
            FetchOutcome::Tweets(texts) => {
                FetchOutcome::from_texts(texts.iter().take(count).cloned().collect())
            }
            FetchOutcome::NoData => FetchOutcome::NoData,
        }
    }
}
