use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod entities;
pub mod parser;
pub mod youtube;

use crate::TranscriptError;

/// One timed caption line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// Decoded, human-readable caption text
    pub text: String,

    /// Start of the line, in milliseconds from the beginning of the video
    pub offset_ms: u64,

    /// How long the line is shown, in milliseconds
    pub duration_ms: u64,

    /// Language of the track the line came from
    pub language_code: String,
}

/// A subtitle stream offered for a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
}

/// Anything that can turn a video identifier into transcript entries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the transcript of a video, preferring the given language
    async fn fetch_transcript(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Vec<TranscriptEntry>, TranscriptError>;

    /// Get the name of the platform behind this source
    fn platform_name(&self) -> &'static str;
}
