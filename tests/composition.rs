// Composition tests: the whole pipeline wired together.
//
// These tests run PredictionService end to end:
//   TweetSource -> TextNormalizer -> TfIdfVectorizer -> LinearClassifier
//     -> LabelEncoder -> aggregate -> AnalyzeResponse
// with a canned in-memory source and a small hand-built model, so results
// are exact. The timeout scenario spawns a real `sh` child process.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tweetmood::acquisition::canned::CannedSource;
use tweetmood::emotion::EmotionLabel;
use tweetmood::error::{AnalysisError, ConfigError};
use tweetmood::model::classifier::LinearClassifier;
use tweetmood::model::encoder::LabelEncoder;
use tweetmood::model::traits::EmotionClassifier;
use tweetmood::model::vectorizer::TfIdfVectorizer;
use tweetmood::model::ModelContext;
use tweetmood::pipeline::analyze::PredictionService;
use tweetmood::pipeline::response::AnalyzeResponse;
use tweetmood::text::normalize::TextNormalizer;

/// Classes in the order a label encoder fitted on the training set keeps them.
const CLASSES: [EmotionLabel; 8] = [
    EmotionLabel::Anger,
    EmotionLabel::Disgust,
    EmotionLabel::Fear,
    EmotionLabel::Joy,
    EmotionLabel::Neutral,
    EmotionLabel::Sadness,
    EmotionLabel::Shame,
    EmotionLabel::Surprise,
];

/// Two-feature model: "happy" pushes towards joy, everything else falls
/// back to the neutral intercept.
fn coffee_model() -> ModelContext {
    let n = TextNormalizer::new();
    let vectorizer = TfIdfVectorizer {
        vocabulary: HashMap::from([(n.normalize("happy"), 0), (n.normalize("coffee"), 1)]),
        idf: vec![1.0, 1.0],
        normalize: true,
    };

    let joy = CLASSES.iter().position(|&l| l == EmotionLabel::Joy).unwrap();
    let neutral = CLASSES.iter().position(|&l| l == EmotionLabel::Neutral).unwrap();

    let mut coef = vec![vec![0.0, 0.0]; CLASSES.len()];
    coef[joy][0] = 5.0;
    let mut intercept = vec![-1.0; CLASSES.len()];
    intercept[joy] = 0.0;
    intercept[neutral] = 1.0;

    ModelContext::from_parts(
        vectorizer,
        LinearClassifier { coef, intercept },
        LabelEncoder {
            classes: CLASSES.to_vec(),
        },
    )
    .unwrap()
}

/// The coffee model, counting how many batches reach inference.
struct CountingClassifier {
    inner: ModelContext,
    batches: AtomicUsize,
}

impl CountingClassifier {
    fn new() -> Self {
        Self {
            inner: coffee_model(),
            batches: AtomicUsize::new(0),
        }
    }

    fn batches(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }
}

impl EmotionClassifier for CountingClassifier {
    fn classify(&self, normalized: &[String]) -> Result<Vec<EmotionLabel>, ConfigError> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        self.inner.classify(normalized)
    }
}

fn service(source: Arc<CannedSource>) -> PredictionService {
    PredictionService::new(source, Arc::new(coffee_model()), 20)
}

fn counted_service(source: Arc<CannedSource>) -> (PredictionService, Arc<CountingClassifier>) {
    let classifier = Arc::new(CountingClassifier::new());
    let service = PredictionService::new(
        source,
        Arc::clone(&classifier) as Arc<dyn EmotionClassifier>,
        20,
    );
    (service, classifier)
}

fn coffee_tweets() -> Vec<String> {
    let mut texts = vec!["I am so happy".to_string(); 5];
    texts.extend(vec!["Drinking coffee".to_string(); 15]);
    texts
}

// ============================================================
// Scenario: mixed emotions, clear majority
// ============================================================

#[tokio::test]
async fn coffee_topic_is_mostly_neutral() {
    let source = Arc::new(CannedSource::with_tweets(coffee_tweets()));
    let (svc, classifier) = counted_service(Arc::clone(&source));
    let analysis = svc.analyze("coffee").await.unwrap();

    assert_eq!(source.calls(), 1);
    assert_eq!(classifier.batches(), 1, "all texts go through inference as one batch");
    assert_eq!(analysis.topic, "coffee");
    assert_eq!(analysis.total_tweets, 20);

    let result = &analysis.result;
    assert_eq!(result.total_classified, 20);
    assert_eq!(result.count(EmotionLabel::Joy), 5);
    assert_eq!(result.count(EmotionLabel::Neutral), 15);
    for label in EmotionLabel::ALL {
        if label != EmotionLabel::Joy && label != EmotionLabel::Neutral {
            assert_eq!(result.count(label), 0, "{label} should be zero");
        }
    }
    assert!((result.percentage(EmotionLabel::Joy) - 25.0).abs() < 1e-9);
    assert!((result.percentage(EmotionLabel::Neutral) - 75.0).abs() < 1e-9);
    assert_eq!(result.dominant_emotion, EmotionLabel::Neutral);
}

#[tokio::test]
async fn success_response_shape() {
    let source = Arc::new(CannedSource::with_tweets(coffee_tweets()));
    let result = service(source).analyze("coffee").await;
    let value = serde_json::to_value(AnalyzeResponse::from_result(result)).unwrap();

    assert_eq!(value["success"], true);
    assert_eq!(value["topic"], "coffee");
    assert_eq!(value["total_tweets"], 20);
    assert_eq!(value["dominant"], "neutral");
    assert_eq!(value["emotion_counts"]["joy"], 5);
    assert_eq!(value["emotion_counts"]["shame"], 0);
    assert_eq!(value["emotion_percentages"]["neutral"], 75.0);
    assert_eq!(value["emotion_counts"].as_object().unwrap().len(), 8);
}

#[tokio::test]
async fn requested_count_limits_the_batch() {
    let source = Arc::new(CannedSource::with_tweets(coffee_tweets()));
    let analysis = service(source).analyze_with_count("coffee", 4).await.unwrap();
    // The first four canned texts are all "happy"
    assert_eq!(analysis.total_tweets, 4);
    assert_eq!(analysis.result.count(EmotionLabel::Joy), 4);
    assert_eq!(analysis.result.dominant_emotion, EmotionLabel::Joy);
}

// ============================================================
// Scenario: nothing fetched
// ============================================================

#[tokio::test]
async fn no_data_means_no_tweets_found() {
    let source = Arc::new(CannedSource::no_data());
    let (svc, classifier) = counted_service(Arc::clone(&source));
    let err = svc.analyze("coffee").await.unwrap_err();

    assert_eq!(source.calls(), 1);
    assert_eq!(classifier.batches(), 0, "inference must not run without tweets");
    assert!(matches!(err, AnalysisError::NoTweetsFound));
    assert!(!err.is_internal());

    let response = AnalyzeResponse::from_error(&err);
    assert!(!response.is_success());
    assert!(response.error_message().unwrap().starts_with("no tweets found"));
}

// ============================================================
// Scenario: tweets fetched, nothing usable after normalization
// ============================================================

#[tokio::test]
async fn all_empty_after_normalization_is_empty_corpus() {
    let source = Arc::new(CannedSource::with_tweets(["123 456", "!!! ???", "the and of"]));
    let (svc, classifier) = counted_service(source);
    let err = svc.analyze("coffee").await.unwrap_err();

    assert_eq!(classifier.batches(), 0);
    assert!(matches!(err, AnalysisError::EmptyCorpus));
    assert_ne!(
        err.user_message(),
        AnalysisError::NoTweetsFound.user_message()
    );
}

#[tokio::test]
async fn partially_empty_batch_classifies_the_rest() {
    let source = Arc::new(CannedSource::with_tweets([
        "I am so happy",
        "12345",
        "Drinking coffee",
        "!!!",
    ]));
    let analysis = service(source).analyze("coffee").await.unwrap();

    assert_eq!(analysis.total_tweets, 4);
    assert_eq!(analysis.result.total_classified, 2);
    assert_eq!(analysis.result.count(EmotionLabel::Joy), 1);
    assert_eq!(analysis.result.count(EmotionLabel::Neutral), 1);
    // 1 vs 1: joy comes first in canonical order
    assert_eq!(analysis.result.dominant_emotion, EmotionLabel::Joy);
    assert!((analysis.result.percentage(EmotionLabel::Joy) - 50.0).abs() < 1e-9);
}

// ============================================================
// Topic validation
// ============================================================

#[tokio::test]
async fn blank_topic_never_reaches_the_source() {
    let source = Arc::new(CannedSource::with_tweets(coffee_tweets()));
    let svc = service(Arc::clone(&source));

    for topic in ["", "   ", "\t\n"] {
        let err = svc.analyze(topic).await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidTopic));
    }
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn topic_is_trimmed() {
    let source = Arc::new(CannedSource::with_tweets(coffee_tweets()));
    let analysis = service(source).analyze("  coffee  ").await.unwrap();
    assert_eq!(analysis.topic, "coffee");
}

// ============================================================
// Concurrency: one shared service, many requests
// ============================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_share_one_model() {
    let source = Arc::new(CannedSource::with_tweets(coffee_tweets()));
    let svc = Arc::new(service(Arc::clone(&source)));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move { svc.analyze("coffee").await })
        })
        .collect();

    for handle in handles {
        let analysis = handle.await.unwrap().unwrap();
        assert_eq!(analysis.result.dominant_emotion, EmotionLabel::Neutral);
    }
    assert_eq!(source.calls(), 8);
}

// ============================================================
// Scenario: the fetch script hangs past its timeout
// ============================================================

#[cfg(unix)]
#[tokio::test]
async fn hung_fetch_script_is_reported_as_no_tweets() {
    use std::time::{Duration, Instant};
    use tweetmood::acquisition::process::ProcessBridge;

    let dir = std::env::temp_dir().join(format!("tweetmood-composition-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let script = dir.join("fetch.sh");
    std::fs::write(&script, "exec sleep 5\n").unwrap();

    let bridge = ProcessBridge::new("sh", &script, dir.join("tweets.json"))
        .unwrap()
        .with_timeout(Duration::from_millis(300));
    let svc = PredictionService::new(Arc::new(bridge), Arc::new(coffee_model()), 20);

    let started = Instant::now();
    let err = svc.analyze("coffee").await.unwrap_err();
    assert!(matches!(err, AnalysisError::NoTweetsFound));
    assert!(started.elapsed() < Duration::from_secs(4));

    std::fs::remove_dir_all(&dir).unwrap();
}
