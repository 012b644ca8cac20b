// Text normalization: ASCII letters only, lowercase, stopwords dropped,
// every surviving token stemmed.
//
// The output must match the preprocessing the vectorizer vocabulary was
// built with, otherwise known words silently fall out of the feature space.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

use super::porter::PorterStemmer;

static NON_ALPHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-zA-Z]").expect("valid non-alpha pattern"));

/// Deterministic text cleaner. Holds only read-only state, so one instance
/// can be shared across threads.
pub struct TextNormalizer {
    stop_words: HashSet<String>,
    stemmer: PorterStemmer,
}

impl TextNormalizer {
    pub fn new() -> Self {
        // NLTK's English list (the crate is built with only the `nltk` feature)
        let stop_words: Vec<String> = get(LANGUAGE::English);
        Self {
            stop_words: stop_words.into_iter().collect(),
            stemmer: PorterStemmer::new(),
        }
    }

    /// Normalize a single text. Returns an empty string when nothing
    /// alphabetic survives; that is valid output, not an error.
    pub fn normalize(&self, text: &str) -> String {
        let letters_only = NON_ALPHA.replace_all(text, " ").to_lowercase();

        letters_only
            .split_whitespace()
            .filter(|word| !self.stop_words.contains(*word))
            .map(|word| self.stemmer.stem(word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Normalize a batch, preserving order and length.
    pub fn normalize_all(&self, texts: &[String]) -> Vec<String> {
        texts.iter().map(|t| self.normalize(t)).collect()
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
