use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use tweetmood::acquisition::process::ProcessBridge;
use tweetmood::config::Config;
use tweetmood::model::ModelContext;
use tweetmood::pipeline::analyze::PredictionService;
use tweetmood::pipeline::response::AnalyzeResponse;

/// tweetmood: emotion analysis of recent tweets about a topic.
///
/// Fetches tweets through an external script, classifies each one into
/// one of eight emotions, and reports the breakdown.
#[derive(Parser)]
#[command(name = "tweetmood", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the emotions in recent tweets about a topic
    Analyze {
        /// The topic or hashtag to search for
        topic: String,

        /// Number of tweets to fetch (default: TWEETMOOD_TWEET_COUNT or 20)
        #[arg(long)]
        count: Option<usize>,

        /// Print the JSON response instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check that the fetch script and model artifacts are in place
    Check,

    /// Serve the analysis API over HTTP
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: 5000)
        #[arg(long, default_value = "5000")]
        port: u16,

        /// Address to bind (default: 127.0.0.1)
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Held until exit so buffered file log lines get flushed
    let _log_guard = init_logging(tweetmood::config::log_file_from_env().as_deref());

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { topic, count, json } => {
            let config = Config::load()?;
            let service = build_service(&config)?;
            let count = count.unwrap_or(config.tweet_count);
            if count == 0 {
                anyhow::bail!("--count must be at least 1");
            }

            let spinner = (!json).then(|| fetch_spinner(&topic));
            let result = service.analyze_with_count(&topic, count).await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }

            if json {
                let response = AnalyzeResponse::from_result(result);
                println!("{}", serde_json::to_string_pretty(&response)?);
                return Ok(());
            }

            match result {
                Ok(analysis) => tweetmood::output::terminal::display_analysis(&analysis),
                Err(e) if e.is_internal() => {
                    return Err(anyhow::Error::new(e).context("Analysis failed"));
                }
                Err(e) => println!("{}", e.user_message().yellow()),
            }
        }

        Commands::Check => {
            let config = Config::load()?;
            if tweetmood::status::show(&config) {
                println!("\n{}", "Ready.".bold());
            } else {
                anyhow::bail!("Setup incomplete, see above");
            }
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let service = build_service(&config)?;
            tweetmood::web::run_server(service, port, &bind).await?;
        }
    }

    Ok(())
}

/// Structured logging to stderr (so --json output stays clean), mirrored
/// as plain text to `log_file` when one is configured.
fn init_logging(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tweetmood=info"));

    let appender = log_file.map(|path| (path, open_log_file(path)));
    let (file_layer, guard, open_error) = match appender {
        Some((_, Ok(appender))) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
                None,
            )
        }
        Some((path, Err(e))) => (None, None, Some(format!("{}: {e:#}", path.display()))),
        None => (None, None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    if let Some(error) = open_error {
        warn!(error = %error, "Could not open log file, logging to stderr only");
    }
    guard
}

fn open_log_file(path: &Path) -> Result<RollingFileAppender> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .with_context(|| format!("{} is not a file path", path.display()))?;
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy().into_owned())
        .build(dir)
        .with_context(|| format!("Failed to open {}", path.display()))
}

/// Check setup, load the models once, and wire the process bridge into a service.
fn build_service(config: &Config) -> Result<PredictionService> {
    config.require_script()?;
    config.require_models()?;

    let models = ModelContext::load(&config.model_dir)
        .with_context(|| format!("Failed to load models from {}", config.model_dir.display()))?;
    let bridge = ProcessBridge::from_config(config).context("Failed to set up tweet fetching")?;

    info!(
        model_dir = %config.model_dir.display(),
        script = %config.fetch_script.display(),
        timeout_secs = config.fetch_timeout.as_secs(),
        "Analysis service ready"
    );

    Ok(PredictionService::new(
        Arc::new(bridge),
        Arc::new(models),
        config.tweet_count,
    ))
}

fn fetch_spinner(topic: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg} ({elapsed})")
            .expect("valid template"),
    );
    pb.set_message(format!("Fetching and analyzing tweets about \"{topic}\"..."));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
