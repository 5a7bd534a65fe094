//! Notescribe - A Rust CLI tool for inserting video transcripts into markdown notes
//!
//! This library finds the YouTube video a note refers to, pulls the caption track
//! through YouTube's internal player API and renders it as a transcript section
//! that is appended to the note.

pub mod cli;
pub mod config;
pub mod detect;
pub mod output;
pub mod pipeline;
pub mod transcript;
pub mod utils;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use detect::{detect_video_urls, extract_video_id, VideoReference};
pub use output::formatters::FormatOptions;
pub use pipeline::{Insertion, Stage, TranscriptPipeline};
pub use transcript::{CaptionTrack, TranscriptEntry, TranscriptSource};

/// Result type used for application glue (config, file I/O)
pub type Result<T> = anyhow::Result<T>;

/// Every way a transcript insertion can fail.
///
/// The `Display` text is the message shown to the user.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("This note already has a transcript")]
    AlreadyHasTranscript,

    #[error("No YouTube URL found in this note")]
    NoUrlFound,

    #[error("Could not extract a video ID from URL: {0}")]
    InvalidVideoId(String),

    #[error("YouTube is receiving too many requests from this IP, try again later")]
    RateLimited,

    #[error("Could not find the YouTube API key on the video page")]
    ApiKeyNotFound,

    #[error("Failed to fetch player data: {0}")]
    PlayerFetchFailed(String),

    #[error("Transcripts are disabled for video {0}")]
    CaptionsDisabled(String),

    #[error("No transcripts are available for video {0}")]
    TranscriptsUnavailable(String),

    #[error("No caption tracks found for video {0}")]
    NoCaptionTracks(String),

    #[error("Failed to fetch transcript: {0}")]
    FetchFailed(String),

    #[error("No transcript entries found")]
    NoEntriesFound,

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for TranscriptError {
    fn from(err: anyhow::Error) -> Self {
        Self::Unknown(format!("{err:#}"))
    }
}
