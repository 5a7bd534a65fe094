use serde::{Deserialize, Serialize};

use crate::transcript::TranscriptEntry;

/// How the transcript section is rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Prefix each line with `[M:SS]` / `[H:MM:SS]`
    pub include_timestamps: bool,

    /// Heading written above the transcript, also used to spot an existing section
    pub section_heading: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            include_timestamps: false,
            section_heading: "## Transcript".to_string(),
        }
    }
}

/// Render entries as a document fragment: blank line, heading, blank line, body
pub fn format_transcript(entries: &[TranscriptEntry], options: &FormatOptions) -> String {
    format!("\n{}\n\n{}", options.section_heading, format_body(entries, options.include_timestamps))
}

/// Render only the transcript text
pub fn format_body(entries: &[TranscriptEntry], include_timestamps: bool) -> String {
    if include_timestamps {
        entries
            .iter()
            .map(|entry| format!("[{}] {}", format_timestamp(entry.offset_ms), entry.text))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        entries
            .iter()
            .map(|entry| entry.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Format an offset as `M:SS`, or `H:MM:SS` from one hour on
pub fn format_timestamp(offset_ms: u64) -> String {
    let total_seconds = offset_ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Whether the document already carries a transcript section
pub fn has_transcript_section(document: &str, section_heading: &str) -> bool {
    document.contains(section_heading)
}

/// The document with the fragment appended
pub fn append_fragment(document: &str, fragment: &str) -> String {
    format!("{}\n{}", document, fragment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, offset_ms: u64, duration_ms: u64) -> TranscriptEntry {
        TranscriptEntry {
            text: text.to_string(),
            offset_ms,
            duration_ms,
            language_code: "en".to_string(),
        }
    }

    fn sample() -> Vec<TranscriptEntry> {
        vec![entry("We're no strangers", 0, 2000), entry("to love", 2000, 1000)]
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "0:00");
        assert_eq!(format_timestamp(45_000), "0:45");
        assert_eq!(format_timestamp(125_000), "2:05");
        assert_eq!(format_timestamp(3_665_000), "1:01:05");
        assert_eq!(format_timestamp(59_999), "0:59");
        assert_eq!(format_timestamp(36_000_000), "10:00:00");
    }

    #[test]
    fn test_format_paragraph() {
        let fragment = format_transcript(&sample(), &FormatOptions::default());
        assert_eq!(fragment, "\n## Transcript\n\nWe're no strangers to love");
    }

    #[test]
    fn test_format_with_timestamps() {
        let options = FormatOptions {
            include_timestamps: true,
            ..FormatOptions::default()
        };
        let fragment = format_transcript(&sample(), &options);
        assert_eq!(fragment, "\n## Transcript\n\n[0:00] We're no strangers\n[0:02] to love");
    }

    #[test]
    fn test_custom_heading() {
        let options = FormatOptions {
            include_timestamps: false,
            section_heading: "### Captions".to_string(),
        };
        assert!(format_transcript(&sample(), &options).starts_with("\n### Captions\n\n"));
    }

    #[test]
    fn test_has_transcript_section() {
        assert!(has_transcript_section("# Note\n\n## Transcript\n\nhello", "## Transcript"));
        assert!(!has_transcript_section("# Note\n\n## Summary", "## Transcript"));
        assert!(!has_transcript_section("## transcript", "## Transcript"));
    }

    #[test]
    fn test_append_fragment() {
        assert_eq!(
            append_fragment("# Note", "\n## Transcript\n\nhi"),
            "# Note\n\n## Transcript\n\nhi"
        );
    }
}
