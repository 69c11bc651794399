use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;

use ytmeta_core::{
    extract_video_id, fetch_metadata, resolve_transcript, CaptionTrack, TranscriptClient,
    TranscriptOutcome, VideoRecord, YtmetaError,
};

#[derive(Parser)]
#[command(name = "ytmeta")]
#[command(about = "Fetch video metadata and the best-available transcript as one JSON record")]
struct Cli {
    /// Video URL or bare video id (prompted for when omitted)
    url: Option<String>,

    /// Write the record as JSON to this file instead of printing it
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Transcript languages to try, in order of preference
    #[arg(short, long, num_args = 1.., default_values_t = [String::from("en"), String::from("hi")])]
    languages: Vec<String>,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn prompt_for_url() -> Result<String> {
    eprint!("Enter video URL: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("failed to read URL from stdin")?;
    Ok(line.trim().to_string())
}

fn print_available_languages(available: &[CaptionTrack]) {
    if available.is_empty() {
        eprintln!(
            "{}",
            style("No caption tracks are available for this video.").yellow()
        );
        return;
    }

    eprintln!("{}", style("Available transcript languages:").yellow());
    for track in available {
        let kind = if track.is_generated() {
            "auto-generated"
        } else {
            "manually created"
        };
        let translatable = if track.is_translatable {
            " [translatable]"
        } else {
            ""
        };
        eprintln!(
            " - {} ({}){}",
            style(&track.language_code).bold(),
            kind,
            translatable
        );
    }
}

fn print_summary(record: &VideoRecord) {
    let meta = &record.metadata;

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{} {}",
        style("Title:").dim(),
        meta.title.as_deref().unwrap_or("(unknown)")
    );
    println!(
        "{} {}",
        style("Author:").dim(),
        meta.author.as_deref().unwrap_or("(unknown)")
    );
    if let Some(views) = meta.views {
        println!("{} {}", style("Views:").dim(), views);
    }
    if let Some(date) = &meta.publish_date {
        println!("{} {}", style("Published:").dim(), date);
    }
    if let Some(length) = meta.length {
        println!("{} {} seconds", style("Length:").dim(), length);
    }
    match &record.transcript {
        Some(block) => println!(
            "{} {} ({} segments)",
            style("Transcript:").dim(),
            style(&block.transcript_language).yellow(),
            block.transcript.len()
        ),
        None => println!("{} {}", style("Transcript:").dim(), style("none").dim()),
    }
}

async fn save_record(record: &VideoRecord, path: &Path) -> Result<()> {
    let pretty_json = serde_json::to_string_pretty(record)?;
    fs::write(path, &pretty_json)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let url = match cli.url {
        Some(url) => url,
        None => prompt_for_url()?,
    };

    let video_id = match extract_video_id(&url) {
        Some(id) => id,
        None => {
            eprintln!(
                "{} {}",
                style("Error:").red().bold(),
                YtmetaError::InvalidUrl { input: url }
            );
            std::process::exit(1);
        }
    };

    eprintln!(
        "\n{}  {}\n",
        style("ytmeta").cyan().bold(),
        style("Video Metadata & Transcript").dim()
    );

    // Step 1: metadata. A failure here is fatal for the run.
    let spinner = create_spinner("Fetching metadata...");
    let metadata = match fetch_metadata(&url, &video_id).await {
        Ok(metadata) => {
            spinner.finish_with_message(format!(
                "{} Metadata fetched: {}",
                style("✓").green().bold(),
                style(metadata.title.as_deref().unwrap_or(&video_id)).dim()
            ));
            metadata
        }
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    // Step 2: transcript. A miss is not fatal; the record just omits the
    // transcript fields.
    let client = TranscriptClient::new();
    let spinner = create_spinner(&format!(
        "Resolving transcript ({})...",
        cli.languages.join(", ")
    ));
    let record = match resolve_transcript(&client, &video_id, &cli.languages).await {
        TranscriptOutcome::Found(transcript) => {
            spinner.finish_with_message(format!(
                "{} Transcript resolved: {} ({} segments)",
                style("✓").green().bold(),
                style(&transcript.language).yellow(),
                transcript.segments.len()
            ));
            VideoRecord::with_transcript(metadata, transcript)
        }
        TranscriptOutcome::Unavailable { available } => {
            spinner.finish_with_message(format!(
                "{} No transcript in the requested languages",
                style("✗").yellow().bold()
            ));
            print_available_languages(&available);
            VideoRecord::new(metadata)
        }
    };

    match &cli.output {
        Some(path) => {
            save_record(&record, path).await?;
            eprintln!(
                "\n{} {}",
                style("Saved:").dim(),
                style(path.display()).cyan()
            );
            print_summary(&record);
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}
