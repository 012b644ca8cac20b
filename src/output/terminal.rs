// Colored terminal output for analysis results.
//
// main.rs delegates all human-readable display here; the JSON path goes
// through pipeline::response instead.

use colored::Colorize;

use crate::emotion::EmotionLabel;
use crate::pipeline::analyze::Analysis;

/// Width of a 100% bar, in characters.
const BAR_WIDTH: usize = 40;

/// Display the emotion breakdown for one topic.
pub fn display_analysis(analysis: &Analysis) {
    let result = &analysis.result;

    println!(
        "\n{}",
        format!("=== Emotions for \"{}\" ===", analysis.topic).bold()
    );
    println!(
        "  Tweets fetched: {}  |  classified: {}",
        analysis.total_tweets, result.total_classified
    );
    println!();

    println!(
        "  {:<10} {:>5}  {:>7}",
        "Emotion".dimmed(),
        "Count".dimmed(),
        "Share".dimmed(),
    );
    println!("  {}", "-".repeat(26 + BAR_WIDTH).dimmed());

    for label in EmotionLabel::ALL {
        let count = result.count(label);
        let pct = result.percentage(label);
        let bar = "#".repeat(bar_len(pct));
        let name = format!("{:<10}", label.as_str());
        let name = if label == result.dominant_emotion {
            name.bold()
        } else {
            name.normal()
        };

        println!(
            "  {} {:>5}  {:>6.1}%  {}",
            name,
            count,
            pct,
            colorize_emotion(label, &bar)
        );
    }

    println!();
    println!(
        "  Dominant emotion: {}",
        colorize_emotion(result.dominant_emotion, result.dominant_emotion.as_str()).bold()
    );
}

/// Bar length for a percentage, rounded to the nearest character.
fn bar_len(pct: f64) -> usize {
    ((pct / 100.0) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize
}

fn colorize_emotion(label: EmotionLabel, text: &str) -> colored::ColoredString {
    match label {
        EmotionLabel::Joy => text.green(),
        EmotionLabel::Sadness => text.blue(),
        EmotionLabel::Fear => text.magenta(),
        EmotionLabel::Anger => text.red(),
        EmotionLabel::Surprise => text.yellow(),
        EmotionLabel::Neutral => text.white(),
        EmotionLabel::Disgust => text.bright_green(),
        EmotionLabel::Shame => text.bright_magenta(),
    }
}
