use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notescribe::cli::{Cli, Commands, TranscriptOverrides};
use notescribe::detect::{detect_video_urls, extract_video_id};
use notescribe::output::{self, formatters};
use notescribe::transcript::youtube::YoutubeClient;
use notescribe::transcript::TranscriptSource;
use notescribe::utils::is_video_id;
use notescribe::{Config, TranscriptError, TranscriptPipeline};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "notescribe=debug" } else { "notescribe=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path).await?,
        None => Config::load().await?,
    };

    match cli.command {
        Commands::Insert { file, overrides, dry_run } => {
            apply_overrides(&mut config, &overrides)?;
            let document = output::read_document(&file)?;

            let client = YoutubeClient::new(&config.network)?;
            let pipeline = TranscriptPipeline::new(
                client,
                config.transcript.language.clone(),
                config.format_options(),
            );

            tracing::info!("Inserting transcript into: {}", file.display());
            let spinner = spinner(cli.quiet, "Fetching transcript...");
            let result = pipeline.run(&document).await;
            spinner.finish_and_clear();

            let insertion = match result {
                Ok(insertion) => insertion,
                Err(e) => return Ok(report_failure(&e)),
            };

            if dry_run {
                output::print_fragment(&insertion);
            } else {
                output::save_document(&insertion, &file)?;
                println!(
                    "{} Inserted transcript ({} entries) into {}",
                    style("✓").green(),
                    insertion.entry_count,
                    file.display()
                );
            }
        }
        Commands::Detect { file } => {
            let document = output::read_document(&file)?;
            let urls = detect_video_urls(&document);
            if urls.is_empty() {
                return Ok(report_failure(&TranscriptError::NoUrlFound));
            }
            for url in urls {
                match extract_video_id(&url) {
                    Some(id) => println!("{}  {}", style(id).cyan(), url),
                    None => println!("{}  {}", style("no id").dim(), url),
                }
            }
        }
        Commands::Fetch { video, overrides } => {
            apply_overrides(&mut config, &overrides)?;

            let video_id = if is_video_id(&video) {
                Some(video.clone())
            } else {
                extract_video_id(&video)
            };
            let Some(video_id) = video_id else {
                return Ok(report_failure(&TranscriptError::InvalidVideoId(video)));
            };

            let client = YoutubeClient::new(&config.network)?;
            let spinner = spinner(cli.quiet, "Fetching transcript...");
            let result = client
                .fetch_transcript(&video_id, &config.transcript.language)
                .await;
            spinner.finish_and_clear();

            match result {
                Ok(entries) if !entries.is_empty() => {
                    println!(
                        "{}",
                        formatters::format_body(&entries, config.transcript.include_timestamps)
                    );
                }
                Ok(_) => return Ok(report_failure(&TranscriptError::NoEntriesFound)),
                Err(e) => return Ok(report_failure(&e)),
            }
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                match &cli.config {
                    Some(path) => println!("Config file: {}", path.display()),
                    None => println!("Config file: {}", Config::config_path()?.display()),
                }
                println!("Run with --show to print the current settings");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Layer per-run flags over the loaded settings and re-check the result
fn apply_overrides(config: &mut Config, overrides: &TranscriptOverrides) -> Result<()> {
    if let Some(language) = &overrides.language {
        config.transcript.language = language.clone();
    }
    if overrides.timestamps {
        config.transcript.include_timestamps = true;
    }
    if let Some(heading) = &overrides.heading {
        config.transcript.section_heading = heading.clone();
    }
    config.validate()
}

fn spinner(quiet: bool, message: &'static str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new_spinner();
    let template = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}");
    if let Ok(template) = template {
        progress.set_style(template);
    }
    progress.set_message(message);
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

fn report_failure(error: &TranscriptError) -> ExitCode {
    eprintln!("{} {}", style("✗").red(), error);
    ExitCode::FAILURE
}
