use std::fmt;

use crate::detect::{detect_video_urls, VideoReference};
use crate::output::formatters::{
    append_fragment, format_transcript, has_transcript_section, FormatOptions,
};
use crate::transcript::TranscriptSource;
use crate::TranscriptError;

/// Where a run currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Idle,
    DetectingReference,
    ExtractingId,
    Fetching,
    Formatting,
    Done,
    Aborted(TranscriptError),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Idle => write!(f, "idle"),
            Stage::DetectingReference => write!(f, "detecting reference"),
            Stage::ExtractingId => write!(f, "extracting id"),
            Stage::Fetching => write!(f, "fetching"),
            Stage::Formatting => write!(f, "formatting"),
            Stage::Done => write!(f, "done"),
            Stage::Aborted(reason) => write!(f, "aborted: {reason}"),
        }
    }
}

/// Result of a successful run, ready to be persisted by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    /// URL the transcript was fetched for
    pub url: String,

    /// Identifier extracted from that URL
    pub video_id: String,

    /// Section that was appended
    pub fragment: String,

    /// Full updated document text
    pub document: String,

    /// Number of caption lines in the section
    pub entry_count: usize,
}

/// End-to-end transcript insertion
pub struct TranscriptPipeline<S> {
    source: S,
    language: String,
    options: FormatOptions,
}

impl<S: TranscriptSource> TranscriptPipeline<S> {
    pub fn new(source: S, language: impl Into<String>, options: FormatOptions) -> Self {
        Self {
            source,
            language: language.into(),
            options,
        }
    }

    /// Insert a transcript into the document text.
    ///
    /// The input is never modified; on success the returned [`Insertion`] holds the
    /// new text. Only the first detected video is used.
    pub async fn run(&self, document: &str) -> Result<Insertion, TranscriptError> {
        let mut stage = Stage::Idle;
        let result = self.advance(document, &mut stage).await;

        match &result {
            Ok(insertion) => {
                transition(&mut stage, Stage::Done);
                tracing::info!(
                    "Inserted {} transcript entries for video {}",
                    insertion.entry_count,
                    insertion.video_id
                );
            }
            Err(reason) => {
                let failed_in = stage.to_string();
                transition(&mut stage, Stage::Aborted(reason.clone()));
                tracing::warn!("Aborted while {}: {}", failed_in, reason);
            }
        }

        result
    }

    async fn advance(
        &self,
        document: &str,
        stage: &mut Stage,
    ) -> Result<Insertion, TranscriptError> {
        if has_transcript_section(document, &self.options.section_heading) {
            return Err(TranscriptError::AlreadyHasTranscript);
        }

        transition(stage, Stage::DetectingReference);
        let url = detect_video_urls(document)
            .into_iter()
            .next()
            .ok_or(TranscriptError::NoUrlFound)?;

        transition(stage, Stage::ExtractingId);
        let reference = VideoReference::from_url(&url).ok_or(TranscriptError::InvalidVideoId(url))?;
        tracing::info!(
            "Found {} video {} at {}",
            self.source.platform_name(),
            reference.video_id,
            reference.url
        );

        transition(stage, Stage::Fetching);
        let entries = self.source.fetch_transcript(&reference.video_id, &self.language).await?;
        if entries.is_empty() {
            return Err(TranscriptError::NoEntriesFound);
        }

        transition(stage, Stage::Formatting);
        let fragment = format_transcript(&entries, &self.options);

        Ok(Insertion {
            document: append_fragment(document, &fragment),
            fragment,
            entry_count: entries.len(),
            url: reference.url,
            video_id: reference.video_id,
        })
    }
}

fn transition(stage: &mut Stage, next: Stage) {
    tracing::debug!("Pipeline stage: {} -> {}", stage, next);
    *stage = next;
}
