// Service-facing response: the outermost error boundary.
//
// Every analysis ends here: success becomes the summary payload, each
// typed error becomes its user-facing message. Internal faults are logged
// in full and reported generically.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{error, info};

use crate::emotion::EmotionLabel;
use crate::error::AnalysisError;

use super::analyze::Analysis;

/// JSON body returned to callers of the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    Success {
        success: bool,
        topic: String,
        total_tweets: usize,
        emotion_counts: BTreeMap<EmotionLabel, u32>,
        emotion_percentages: BTreeMap<EmotionLabel, f64>,
        dominant: EmotionLabel,
    },
    Failure {
        success: bool,
        error: String,
    },
}

impl AnalyzeResponse {
    pub fn from_result(result: Result<Analysis, AnalysisError>) -> Self {
        match result {
            Ok(analysis) => Self::from_analysis(analysis),
            Err(err) => Self::from_error(&err),
        }
    }

    pub fn from_analysis(analysis: Analysis) -> Self {
        AnalyzeResponse::Success {
            success: true,
            topic: analysis.topic,
            total_tweets: analysis.total_tweets,
            emotion_counts: analysis.result.emotion_counts,
            emotion_percentages: analysis.result.emotion_percentages,
            dominant: analysis.result.dominant_emotion,
        }
    }

    pub fn from_error(err: &AnalysisError) -> Self {
        if err.is_internal() {
            error!(error = ?err, "Analysis failed with an internal fault");
        } else {
            info!(error = %err, "Analysis produced no result");
        }
        Self::failure(err.user_message())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        AnalyzeResponse::Failure {
            success: false,
            error: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AnalyzeResponse::Success { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            AnalyzeResponse::Failure { error, .. } => Some(error),
            AnalyzeResponse::Success { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_shape() {
        let value = serde_json::to_value(AnalyzeResponse::failure("nope")).unwrap();
        assert_eq!(value, serde_json::json!({ "success": false, "error": "nope" }));
    }

    #[test]
    fn test_from_error_uses_user_message() {
        let response = AnalyzeResponse::from_error(&AnalysisError::Unexpected(
            "join error: panic in worker".to_string(),
        ));
        assert!(!response.is_success());
        let message = response.error_message().unwrap();
        assert!(!message.contains("panic"));
    }
}
