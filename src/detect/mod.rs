//! Locating the video a note refers to.
//!
//! Three independent scans feed one ordered, deduplicated list of candidate
//! URLs: the front-matter `source:` field, markdown links and embeds, and bare
//! URLs in the body. Every scan always runs; discovery order is preserved.

use regex::Regex;
use std::sync::LazyLock;

use crate::utils::{is_youtube_url, trim_trailing_punctuation};

static FRONT_MATTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A---[ \t]*\r?\n((?s:.*?))\r?\n---[ \t]*(?:\r?\n|\z)")
        .expect("Invalid front-matter regex")
});

static SOURCE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^source:[ \t]*["']?([^"'\r\n]*?)["']?[ \t]*$"#)
        .expect("Invalid source field regex")
});

static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!?\[[^\]]*\]\((https?://[^\s)]+)\)").expect("Invalid markdown link regex")
});

static BARE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"https?://(?:(?:www|m|music)\.)?",
        r"(?:youtube(?:-nocookie)?\.com/(?:watch\?|embed/|v/|shorts/)|youtu\.be/)",
        r#"[^\s<>()\[\]"'`]+"#,
    ))
    .expect("Invalid bare URL regex")
});

/// Identifier patterns, tried in order; the first capture group is the id.
static VIDEO_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // watch?v=<id>, with v anywhere in the query
        r"^(?:https?://)?(?:[A-Za-z0-9-]+\.)*youtube\.com/watch/?\?(?:[^#\s]*&)?v=([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
        // youtu.be/<id>
        r"^(?:https?://)?(?:www\.)?youtu\.be/([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
        // /embed/<id>
        r"^(?:https?://)?(?:[A-Za-z0-9-]+\.)*youtube(?:-nocookie)?\.com/embed/([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
        // legacy /v/<id>
        r"^(?:https?://)?(?:[A-Za-z0-9-]+\.)*youtube\.com/v/([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
        // /shorts/<id>
        r"^(?:https?://)?(?:[A-Za-z0-9-]+\.)*youtube\.com/shorts/([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid video id regex"))
    .collect()
});

/// A video URL found in a note together with its identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoReference {
    pub url: String,
    pub video_id: String,
}

impl VideoReference {
    /// Build a reference from a URL, if an identifier can be extracted from it
    pub fn from_url(url: &str) -> Option<Self> {
        extract_video_id(url).map(|video_id| Self {
            url: url.to_string(),
            video_id,
        })
    }
}

/// Scan document text for candidate video URLs, in discovery order
pub fn detect_video_urls(text: &str) -> Vec<String> {
    let mut found = Vec::new();

    for url in front_matter_sources(text) {
        push_unique(&mut found, url);
    }

    for caps in MARKDOWN_LINK.captures_iter(text) {
        let url = trim_trailing_punctuation(&caps[1]);
        if is_youtube_url(url) {
            push_unique(&mut found, url);
        }
    }

    for m in BARE_URL.find_iter(text) {
        push_unique(&mut found, trim_trailing_punctuation(m.as_str()));
    }

    tracing::debug!("Detected {} candidate video URL(s)", found.len());
    found
}

/// Extract the 11-character video identifier from any supported URL shape
pub fn extract_video_id(url: &str) -> Option<String> {
    let url = url.trim();
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .map(|caps| caps[1].to_string())
}

/// `source:` values from the leading front-matter block that mention YouTube
fn front_matter_sources(text: &str) -> Vec<&str> {
    let Some(block) = FRONT_MATTER.captures(text).and_then(|caps| caps.get(1)) else {
        return Vec::new();
    };

    SOURCE_FIELD
        .captures_iter(block.as_str())
        .filter_map(|caps| caps.get(1))
        .map(|value| trim_trailing_punctuation(value.as_str().trim()))
        .filter(|value| {
            ["youtube.com", "youtube-nocookie.com", "youtu.be"]
                .iter()
                .any(|host| value.contains(host))
        })
        .collect()
}

fn push_unique(found: &mut Vec<String>, url: &str) {
    if !url.is_empty() && !found.iter().any(|existing| existing == url) {
        found.push(url.to_string());
    }
}
