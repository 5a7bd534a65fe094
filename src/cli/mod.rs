use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "notescribe",
    about = "Notescribe - Append the transcript of a YouTube video to the markdown note that links it",
    version,
    long_about = "Finds the YouTube video a markdown note refers to (front-matter `source:`, markdown links or bare URLs), downloads its captions and appends them to the note as a transcript section."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use this configuration file instead of the default location
    #[arg(short, long, global = true, value_name = "FILE", env = "NOTESCRIBE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Append the transcript of the note's video to the note
    Insert {
        /// Markdown note to update
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        overrides: TranscriptOverrides,

        /// Print the section instead of writing it to the note
        #[arg(long)]
        dry_run: bool,
    },

    /// List the video URLs found in a note
    Detect {
        /// Markdown note to scan
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the transcript of a video without touching any note
    Fetch {
        /// Video URL or 11-character video ID
        #[arg(value_name = "URL_OR_ID")]
        video: String,

        #[command(flatten)]
        overrides: TranscriptOverrides,
    },

    /// Show configuration and where it is stored
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

/// Per-run overrides of the configured transcript settings
#[derive(Args, Clone, Debug, Default)]
pub struct TranscriptOverrides {
    /// Preferred caption language (falls back to the same base language, then any)
    #[arg(short, long, value_name = "LANG", env = "NOTESCRIBE_LANGUAGE")]
    pub language: Option<String>,

    /// Prefix every line with its timestamp
    #[arg(short, long)]
    pub timestamps: bool,

    /// Heading of the transcript section
    #[arg(long, value_name = "HEADING", env = "NOTESCRIBE_HEADING")]
    pub heading: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_insert_with_overrides() {
        let cli = Cli::try_parse_from([
            "notescribe", "insert", "note.md", "--language", "de", "--timestamps", "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Insert { file, overrides, dry_run } => {
                assert_eq!(file, PathBuf::from("note.md"));
                assert_eq!(overrides.language.as_deref(), Some("de"));
                assert!(overrides.timestamps);
                assert!(dry_run);
            }
            _ => panic!("expected insert command"),
        }
    }
}
