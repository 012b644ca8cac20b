// Typed errors for the analysis pipeline.
//
// Acquisition failures never show up here: the bridge absorbs them into
// FetchOutcome::NoData. Everything that can reach the caller of
// PredictionService::analyze is one of these variants, and the response
// boundary maps each one to a user-facing message.

use std::path::PathBuf;

/// Fatal setup problems: missing fetch script, missing or inconsistent
/// model artifacts, classifier output the encoder cannot decode.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("fetch script not found at {}", .0.display())]
    MissingScript(PathBuf),

    #[error("model artifact not found: {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("model artifacts disagree: {0}")]
    Mismatch(String),

    #[error("label code {code} is outside the encoder range 0..{classes}")]
    UnknownCode { code: usize, classes: usize },
}

/// Errors returned by `PredictionService::analyze`.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("topic is empty")]
    InvalidTopic,

    #[error("acquisition returned no tweets")]
    NoTweetsFound,

    #[error("every fetched tweet normalized to empty text")]
    EmptyCorpus,

    #[error("configuration fault: {0}")]
    Configuration(#[from] ConfigError),

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl AnalysisError {
    /// Message safe to show an end user. Internal faults get a generic
    /// message; their detail only goes to the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            AnalysisError::InvalidTopic => "please enter a topic to analyze",
            AnalysisError::NoTweetsFound => "no tweets found for this topic. try another keyword.",
            AnalysisError::EmptyCorpus => {
                "tweets were found, but none had usable text after preprocessing. try another keyword."
            }
            AnalysisError::Configuration(_) => {
                "the analysis service is not configured correctly. please contact the operator."
            }
            AnalysisError::Unexpected(_) => "something went wrong while analyzing this topic.",
        }
    }

    /// True for faults on the server side rather than in the request or its data.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AnalysisError::Configuration(_) | AnalysisError::Unexpected(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tweets_and_empty_corpus_messages_differ() {
        assert_ne!(
            AnalysisError::NoTweetsFound.user_message(),
            AnalysisError::EmptyCorpus.user_message()
        );
    }

    #[test]
    fn test_internal_messages_hide_detail() {
        let err = AnalysisError::Configuration(ConfigError::MissingArtifact(PathBuf::from(
            "/secret/model/trained_model.json",
        )));
        assert!(err.is_internal());
        assert!(!err.user_message().contains("/secret"));
        assert!(err.to_string().contains("/secret"));
    }

    #[test]
    fn test_request_errors_are_not_internal() {
        assert!(!AnalysisError::InvalidTopic.is_internal());
        assert!(!AnalysisError::NoTweetsFound.is_internal());
        assert!(!AnalysisError::EmptyCorpus.is_internal());
    }
}
