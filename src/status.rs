// System status display: shows whether the fetch script and model
// artifacts are in place before anything tries to use them.

use colored::Colorize;

use crate::config::Config;
use crate::model::ModelContext;

/// Display setup status to the terminal. Returns true when both the fetch
/// script and the model artifacts are usable.
pub fn show(config: &Config) -> bool {
    let script_ok = config.fetch_script.exists();
    println!(
        "Fetch script: {} ({})",
        config.fetch_script.display(),
        ok_or_missing(script_ok)
    );
    println!("  Interpreter: {}", config.interpreter);
    println!("  Artifact path: {}", config.artifact_path.display());
    println!("  Timeout: {}s", config.fetch_timeout.as_secs());
    println!("  Tweets per analysis: {}", config.tweet_count);
    match &config.log_file {
        Some(path) => println!("  Log file: {}", path.display()),
        None => println!("  Log file: off"),
    }
    if !script_ok {
        println!("  Set TWEETMOOD_FETCH_SCRIPT to the script's location");
    }

    let models_ok = match ModelContext::load(&config.model_dir) {
        Ok(models) => {
            println!(
                "Models: {} ({})",
                config.model_dir.display(),
                ok_or_missing(true)
            );
            println!(
                "  Vocabulary: {} terms, {} feature columns",
                models.vectorizer().vocabulary.len(),
                models.vectorizer().n_features()
            );
            let classes: Vec<&str> = models.encoder().classes.iter().map(|c| c.as_str()).collect();
            println!("  Classes: {}", classes.join(", "));
            true
        }
        Err(e) => {
            println!("Models: {} ({})", config.model_dir.display(), ok_or_missing(false));
            println!("  {e}");
            false
        }
    };

    script_ok && models_ok
}

fn ok_or_missing(ok: bool) -> colored::ColoredString {
    if ok {
        "ok".green()
    } else {
        "unavailable".red()
    }
}
