use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::acquisition::process::DEFAULT_FETCH_TIMEOUT;

/// Number of tweets requested per analysis unless overridden.
pub const DEFAULT_TWEET_COUNT: usize = 20;

/// File the log output is mirrored to unless overridden.
pub const DEFAULT_LOG_FILE: &str = "debug.log";

/// Log file named by TWEETMOOD_LOG_FILE. An empty value turns file logging
/// off. Read on its own because logging starts before the rest of Config.
pub fn log_file_from_env() -> Option<PathBuf> {
    parse_log_file(env::var("TWEETMOOD_LOG_FILE").ok())
}

fn parse_log_file(raw: Option<String>) -> Option<PathBuf> {
    match raw {
        None => Some(PathBuf::from(DEFAULT_LOG_FILE)),
        Some(value) if value.trim().is_empty() => None,
        Some(value) => Some(PathBuf::from(value.trim())),
    }
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// setting has a default matching the stock directory layout (model/ and
/// node/ next to the working directory).
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing the three exported model artifacts
    pub model_dir: PathBuf,
    /// The external fetch script
    pub fetch_script: PathBuf,
    /// Program used to run the fetch script
    pub interpreter: String,
    /// Where the fetch script writes its JSON artifact
    pub artifact_path: PathBuf,
    /// Hard limit on one fetch script run
    pub fetch_timeout: Duration,
    /// Tweets requested per analysis
    pub tweet_count: usize,
    /// Plain-text copy of the log output, if any
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_dir: crate::model::default_model_dir(),
            fetch_script: PathBuf::from("node").join("tweet_fetch.js"),
            interpreter: "node".to_string(),
            artifact_path: PathBuf::from("tweets.json"),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            tweet_count: DEFAULT_TWEET_COUNT,
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let fetch_timeout = match env::var("TWEETMOOD_FETCH_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.trim().parse::<u64>().with_context(|| {
                format!("TWEETMOOD_FETCH_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}")
            })?),
            Err(_) => defaults.fetch_timeout,
        };

        let tweet_count = match env::var("TWEETMOOD_TWEET_COUNT") {
            Ok(raw) => raw.trim().parse::<usize>().with_context(|| {
                format!("TWEETMOOD_TWEET_COUNT must be a positive integer, got {raw:?}")
            })?,
            Err(_) => defaults.tweet_count,
        };
        if tweet_count == 0 {
            anyhow::bail!("TWEETMOOD_TWEET_COUNT must be at least 1");
        }

        Ok(Self {
            model_dir: env::var("TWEETMOOD_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            fetch_script: env::var("TWEETMOOD_FETCH_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or(defaults.fetch_script),
            interpreter: env::var("TWEETMOOD_INTERPRETER").unwrap_or(defaults.interpreter),
            artifact_path: env::var("TWEETMOOD_ARTIFACT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifact_path),
            fetch_timeout,
            tweet_count,
            log_file: log_file_from_env(),
        })
    }

    /// Check that the fetch script exists. A missing script is a setup
    /// problem, so callers should run this before serving any request.
    pub fn require_script(&self) -> Result<()> {
        if !self.fetch_script.exists() {
            anyhow::bail!(
                "Fetch script not found at {}\n\
                 Set TWEETMOOD_FETCH_SCRIPT to its location.",
                self.fetch_script.display()
            );
        }
        Ok(())
    }

    /// Check that all model artifacts are present.
    pub fn require_models(&self) -> Result<()> {
        if !crate::model::model_files_present(&self.model_dir) {
            anyhow::bail!(
                "Model artifacts not found in {}\n\
                 Expected {}, {} and {}. Set TWEETMOOD_MODEL_DIR to the export directory.",
                self.model_dir.display(),
                crate::model::VECTORIZER_FILE,
                crate::model::CLASSIFIER_FILE,
                crate::model::ENCODER_FILE,
            );
        }
        Ok(())
    }
}
