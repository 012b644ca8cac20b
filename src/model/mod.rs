// Pretrained model artifacts: vectorizer, classifier, label encoder.
//
// All three are exported as JSON by the training pipeline and loaded once
// at startup into a ModelContext. The context is immutable after load and
// is shared by Arc, so concurrent requests read it without locking.

pub mod classifier;
pub mod encoder;
pub mod traits;
pub mod vectorizer;

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::emotion::EmotionLabel;
use crate::error::ConfigError;

use classifier::LinearClassifier;
use encoder::LabelEncoder;
use traits::EmotionClassifier;
use vectorizer::TfIdfVectorizer;

pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";
pub const CLASSIFIER_FILE: &str = "trained_model.json";
pub const ENCODER_FILE: &str = "label_encoder.json";

/// Default location of the artifacts, relative to the working directory.
pub fn default_model_dir() -> PathBuf {
    PathBuf::from("model")
}

/// Check whether all three artifact files exist in `dir`.
pub fn model_files_present(dir: &Path) -> bool {
    [VECTORIZER_FILE, CLASSIFIER_FILE, ENCODER_FILE]
        .iter()
        .all(|f| dir.join(f).exists())
}

/// The loaded, validated model bundle.
#[derive(Debug)]
pub struct ModelContext {
    vectorizer: TfIdfVectorizer,
    classifier: LinearClassifier,
    encoder: LabelEncoder,
}

impl ModelContext {
    /// Load and cross-check the three artifacts from `model_dir`.
    pub fn load(model_dir: &Path) -> Result<Self, ConfigError> {
        let vectorizer: TfIdfVectorizer = read_artifact(&model_dir.join(VECTORIZER_FILE))?;
        let classifier: LinearClassifier = read_artifact(&model_dir.join(CLASSIFIER_FILE))?;
        let encoder: LabelEncoder = read_artifact(&model_dir.join(ENCODER_FILE))?;

        let context = Self::from_parts(vectorizer, classifier, encoder)?;

        debug!(
            model_dir = %model_dir.display(),
            vocabulary = context.vectorizer.vocabulary.len(),
            classes = context.encoder.n_classes(),
            "Loaded emotion model"
        );

        Ok(context)
    }

    /// Assemble a context from already-deserialized parts, checking that
    /// their dimensions agree.
    pub fn from_parts(
        vectorizer: TfIdfVectorizer,
        classifier: LinearClassifier,
        encoder: LabelEncoder,
    ) -> Result<Self, ConfigError> {
        vectorizer.validate()?;
        classifier.validate()?;
        encoder.validate()?;

        if classifier.n_features() != vectorizer.n_features() {
            return Err(ConfigError::Mismatch(format!(
                "vectorizer produces {} features but classifier expects {}",
                vectorizer.n_features(),
                classifier.n_features()
            )));
        }
        if classifier.n_classes() != encoder.n_classes() {
            return Err(ConfigError::Mismatch(format!(
                "classifier predicts {} classes but label encoder knows {}",
                classifier.n_classes(),
                encoder.n_classes()
            )));
        }

        Ok(Self {
            vectorizer,
            classifier,
            encoder,
        })
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &LinearClassifier {
        &self.classifier
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    /// Vectorize, predict and decode a batch of normalized texts in one pass.
    pub fn classify<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<EmotionLabel>, ConfigError> {
        let matrix = self.vectorizer.transform(texts);
        let codes = self.classifier.predict(&matrix);
        self.encoder.decode(&codes)
    }
}

impl EmotionClassifier for ModelContext {
    fn classify(&self, normalized: &[String]) -> Result<Vec<EmotionLabel>, ConfigError> {
        ModelContext::classify(self, normalized)
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingArtifact(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
