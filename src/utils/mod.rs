use url::Url;

/// Hosts that serve YouTube videos
pub const YOUTUBE_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtu.be",
    "www.youtu.be",
    "youtube-nocookie.com",
    "www.youtube-nocookie.com",
];

/// Characters stripped from the end of a URL found in running text
const TRAILING_PUNCTUATION: &[char] = &[')', ']', '}', ',', '.', '>'];

/// Check whether a host name belongs to YouTube
pub fn is_youtube_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    YOUTUBE_HOSTS.contains(&host.as_str())
}

/// Check whether a URL string points at a YouTube host
pub fn is_youtube_url(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(is_youtube_host))
        .unwrap_or(false)
}

/// Strip closing brackets and sentence punctuation glued to the end of a URL
pub fn trim_trailing_punctuation(url: &str) -> &str {
    url.trim_end_matches(TRAILING_PUNCTUATION)
}

/// Base language of a language tag (`en-US` -> `en`)
pub fn base_language(code: &str) -> &str {
    code.split(['-', '_']).next().unwrap_or(code)
}

/// Whether the input is a bare 11-character video identifier
pub fn is_video_id(input: &str) -> bool {
    input.len() == 11
        && input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
