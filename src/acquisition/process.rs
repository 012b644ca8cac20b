// Child-process acquisition bridge.
//
// Runs the external fetch script (`<interpreter> <script> <topic> <count>`),
// waits for it under a hard timeout, then reads the JSON artifact the
// script leaves behind:
//
//   { "success": true, "tweets": [ { "text": "..." }, ... ] }
//
// Scraping is the least reliable step in the whole pipeline, so every
// failure here (spawn error, non-zero exit, timeout, missing or malformed
// artifact, reported failure) is logged with full context and collapsed
// into FetchOutcome::NoData. Only a missing script at construction time is
// treated as a configuration fault.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::ConfigError;
use crate::output::truncate_chars;

use super::traits::{FetchOutcome, TweetSource};

/// Upper bound on one fetch script run.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(200);

#[derive(Debug, Deserialize)]
struct Artifact {
    success: bool,
    #[serde(default)]
    tweets: Vec<ArtifactTweet>,
}

#[derive(Debug, Deserialize)]
struct ArtifactTweet {
    text: String,
}

/// Why one acquisition attempt produced nothing. Never leaves this module
/// except as a log line.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionFailure {
    #[error("could not remove stale artifact {}: {source}", .path.display())]
    StaleArtifact {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("another fetch held the artifact slot for the whole {0:?} budget")]
    Busy(Duration),

    #[error("fetch script disappeared from {}", .0.display())]
    ScriptMissing(PathBuf),

    #[error("failed to start fetch script: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed while waiting for fetch script: {0}")]
    Wait(#[source] std::io::Error),

    #[error("fetch script timed out after {0:?}")]
    Timeout(Duration),

    #[error("fetch script failed ({status})\nstdout: {stdout}\nstderr: {stderr}")]
    Exit {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },

    #[error("fetch script exited cleanly but wrote no artifact at {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error("could not read artifact: {0}")]
    ReadArtifact(#[source] std::io::Error),

    #[error("artifact is not valid JSON of the expected shape: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("fetch script reported failure")]
    ReportedFailure,

    #[error("artifact contained no tweets")]
    Empty,
}

/// Supervises the external fetch script.
pub struct ProcessBridge {
    interpreter: String,
    script: PathBuf,
    artifact_path: PathBuf,
    timeout: Duration,
    // The script writes to one fixed path, so runs of the same bridge must
    // not overlap between stale-artifact removal and artifact read. Waiting
    // for it counts against the caller's timeout.
    artifact_lock: Mutex<()>,
}

impl ProcessBridge {
    /// Create a bridge. Fails fast if the script is not where it should be.
    pub fn new(
        interpreter: impl Into<String>,
        script: impl Into<PathBuf>,
        artifact_path: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let script = script.into();
        if !script.exists() {
            return Err(ConfigError::MissingScript(script));
        }

        Ok(Self {
            interpreter: interpreter.into(),
            script,
            artifact_path: artifact_path.into(),
            timeout: DEFAULT_FETCH_TIMEOUT,
            artifact_lock: Mutex::new(()),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.interpreter.clone(),
            config.fetch_script.clone(),
            config.artifact_path.clone(),
        )?
        .with_timeout(config.fetch_timeout))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    fn command_line(&self, topic: &str, count: usize) -> String {
        format!(
            "{} {} {:?} {}",
            self.interpreter,
            self.script.display(),
            topic,
            count
        )
    }

    async fn run(&self, topic: &str, count: usize) -> Result<Vec<String>, AcquisitionFailure> {
        // One deadline covers waiting for the artifact slot and the run itself.
        let deadline = Instant::now() + self.timeout;

        let _guard = tokio::time::timeout_at(deadline, self.artifact_lock.lock())
            .await
            .map_err(|_| AcquisitionFailure::Busy(self.timeout))?;

        remove_stale_artifact(&self.artifact_path).await?;

        if !self.script.exists() {
            return Err(AcquisitionFailure::ScriptMissing(self.script.clone()));
        }

        let mut command = Command::new(&self.interpreter);
        command
            .arg(&self.script)
            .arg(topic)
            .arg(count.to_string())
            .env("NODE_OPTIONS", "--unhandled-rejections=strict")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so anything the script forks can be killed with it.
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(AcquisitionFailure::Spawn)?;
        let group = child.id();
        let stdout_task = tokio::spawn(read_stream(child.stdout.take()));
        let stderr_task = tokio::spawn(read_stream(child.stderr.take()));

        let status = match tokio::time::timeout_at(deadline, child.wait()).await {
            Ok(result) => result.map_err(AcquisitionFailure::Wait)?,
            Err(_) => {
                kill_process_group(group);
                return Err(AcquisitionFailure::Timeout(self.timeout));
            }
        };
        // Leftover descendants would hold the pipes open.
        kill_process_group(group);

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        if !status.success() {
            return Err(AcquisitionFailure::Exit {
                status,
                stdout,
                stderr,
            });
        }

        debug!(stdout = %stdout, "Fetch script output");
        if !stderr.trim().is_empty() {
            warn!(stderr = %stderr, "Fetch script wrote to stderr");
        }

        if !self.artifact_path.exists() {
            return Err(AcquisitionFailure::MissingArtifact(
                self.artifact_path.clone(),
            ));
        }

        let raw = tokio::fs::read_to_string(&self.artifact_path)
            .await
            .map_err(AcquisitionFailure::ReadArtifact)?;
        let artifact: Artifact =
            serde_json::from_str(&raw).map_err(AcquisitionFailure::Malformed)?;

        if !artifact.success {
            return Err(AcquisitionFailure::ReportedFailure);
        }

        let texts: Vec<String> = artifact.tweets.into_iter().map(|t| t.text).collect();
        if texts.is_empty() {
            return Err(AcquisitionFailure::Empty);
        }
        Ok(texts)
    }
}

async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        if let Err(e) = stream.read_to_end(&mut buf).await {
            debug!(error = %e, "Stopped reading fetch script output");
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(unix)]
fn kill_process_group(group: Option<u32>) {
    let Some(pgid) = group.and_then(|id| libc::pid_t::try_from(id).ok()) else {
        return;
    };
    // SAFETY: killpg only sends a signal. A group with no members left
    // returns ESRCH, which is fine to ignore.
    unsafe {
        libc::killpg(pgid, libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_group: Option<u32>) {}

async fn remove_stale_artifact(path: &Path) -> Result<(), AcquisitionFailure> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "Removed stale artifact");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(AcquisitionFailure::StaleArtifact {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[async_trait]
impl TweetSource for ProcessBridge {
    async fn fetch(&self, topic: &str, count: usize) -> FetchOutcome {
        info!(topic, count, "Fetching tweets via external script");

        match self.run(topic, count).await {
            Ok(texts) => {
                info!(
                    topic,
                    fetched = texts.len(),
                    first = %truncate_chars(&texts[0], 50),
                    "Fetched tweets"
                );
                FetchOutcome::Tweets(texts)
            }
            Err(failure) => {
                let exit_code = match &failure {
                    AcquisitionFailure::Exit { status, .. } => status.code(),
                    _ => None,
                };
                error!(
                    topic,
                    command = %self.command_line(topic, count),
                    exit_code = ?exit_code,
                    error = %failure,
                    "Tweet acquisition failed, returning no data"
                );
                FetchOutcome::NoData
            }
        }
    }
}
