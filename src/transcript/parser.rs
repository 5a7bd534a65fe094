use regex::Regex;
use std::sync::LazyLock;

use super::entities::decode;
use super::TranscriptEntry;
use crate::TranscriptError;

static TEXT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<text start="(\d+(?:\.\d+)?)" dur="(\d+(?:\.\d+)?)"[^>]*>([^<]*)</text>"#)
        .expect("Invalid caption element regex")
});

/// Parse YouTube timedtext XML into transcript entries, in document order
pub fn parse_captions(
    xml: &str,
    language_code: &str,
) -> Result<Vec<TranscriptEntry>, TranscriptError> {
    let entries: Vec<TranscriptEntry> = TEXT_ELEMENT
        .captures_iter(xml)
        .map(|caps| TranscriptEntry {
            text: decode(&caps[3]),
            offset_ms: seconds_to_ms(&caps[1]),
            duration_ms: seconds_to_ms(&caps[2]),
            language_code: language_code.to_string(),
        })
        .collect();

    if entries.is_empty() {
        return Err(TranscriptError::NoEntriesFound);
    }

    tracing::debug!("Parsed {} caption entries", entries.len());
    Ok(entries)
}

fn seconds_to_ms(seconds: &str) -> u64 {
    // The element regex only admits plain decimals.
    let seconds: f64 = seconds.parse().unwrap_or(0.0);
    (seconds * 1000.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0" dur="2">We&amp;#39;re no strangers</text><text start="2.04" dur="1.5">to love</text><text start="3665.2" dur="0.8">&amp;lt;music&amp;gt;</text></transcript>"#;

    #[test]
    fn test_parse_entries_in_order() {
        let entries = parse_captions(SAMPLE, "en").unwrap();
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].text, "We're no strangers");
        assert_eq!(entries[0].offset_ms, 0);
        assert_eq!(entries[0].duration_ms, 2000);

        assert_eq!(entries[1].text, "to love");
        assert_eq!(entries[1].offset_ms, 2040);
        assert_eq!(entries[1].duration_ms, 1500);

        assert_eq!(entries[2].text, "<music>");
        assert_eq!(entries[2].offset_ms, 3_665_200);
    }

    #[test]
    fn test_language_comes_from_caller() {
        let entries = parse_captions(SAMPLE, "en-GB").unwrap();
        assert!(entries.iter().all(|entry| entry.language_code == "en-GB"));
    }

    #[test]
    fn test_multiline_text_is_kept() {
        let xml = r#"<transcript><text start="1" dur="1">first
second</text></transcript>"#;
        let entries = parse_captions(xml, "en").unwrap();
        assert_eq!(entries[0].text, "first\nsecond");
    }

    #[test]
    fn test_no_text_elements_is_an_error() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript></transcript>"#;
        assert_eq!(parse_captions(xml, "en"), Err(TranscriptError::NoEntriesFound));
        assert_eq!(parse_captions("", "en"), Err(TranscriptError::NoEntriesFound));
    }

    #[test]
    fn test_other_serialisations_are_not_entries() {
        let srv3 = r#"<timedtext format="3"><body><p t="0" d="2000">hello</p></body></timedtext>"#;
        assert_eq!(parse_captions(srv3, "en"), Err(TranscriptError::NoEntriesFound));
    }
}
