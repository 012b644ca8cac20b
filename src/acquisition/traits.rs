// TweetSource trait: the swap-ready acquisition abstraction.

use async_trait::async_trait;

/// Result of one acquisition attempt. There is no error variant: sources
/// log their own diagnostics and degrade to `NoData`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// At least one raw text.
    Tweets(Vec<String>),
    /// Nothing usable was fetched, for whatever reason.
    NoData,
}

impl FetchOutcome {
    /// Wrap fetched texts, collapsing an empty list to `NoData`.
    pub fn from_texts(texts: Vec<String>) -> Self {
        if texts.is_empty() {
            FetchOutcome::NoData
        } else {
            FetchOutcome::Tweets(texts)
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, FetchOutcome::NoData)
    }
}

/// Anything that can produce raw texts for a topic.
#[async_trait]
pub trait TweetSource: Send + Sync {
    /// Fetch up to `count` texts about `topic`. Must not panic or block
    /// without bound.
    async fn fetch(&self, topic: &str, count: usize) -> FetchOutcome;
}
