//! Character reference decoding for caption text.
//!
//! YouTube escapes caption text twice, so `'` arrives as `&amp;#39;`.
//! [`decode`] runs exactly two passes. Looping until nothing changes would
//! also unescape text that was legitimately encoded once.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9A-Fa-f]+|[A-Za-z][A-Za-z0-9]*);").expect("Invalid entity regex")
});

/// Decode HTML/XML character references, two passes
pub fn decode(input: &str) -> String {
    let once = decode_once(input);
    decode_once(&once)
}

/// Resolve every known character reference in a single pass
pub fn decode_once(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    ENTITY
        .replace_all(input, |caps: &Captures| {
            resolve(&caps[1])
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn resolve(reference: &str) -> Option<char> {
    if let Some(numeric) = reference.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    match reference {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_numeric() {
        assert_eq!(decode("Let&#39;s go"), "Let's go");
        assert_eq!(decode("&#x3C;&#x3E;"), "<>");
        assert_eq!(decode("&#X41;"), "A");
    }

    #[test]
    fn test_decode_named() {
        assert_eq!(decode("A &amp; B"), "A & B");
        assert_eq!(decode("&lt;tag&gt;"), "<tag>");
        assert_eq!(decode("&quot;hi&quot; &apos;there&apos;"), "\"hi\" 'there'");
        assert_eq!(decode("a&nbsp;b"), "a b");
    }

    #[test]
    fn test_decode_double_encoded() {
        assert_eq!(decode("&amp;#39;"), "'");
        assert_eq!(decode("We&amp;#39;re no strangers"), "We're no strangers");
        assert_eq!(decode("&amp;amp;"), "&");
    }

    #[test]
    fn test_decode_stops_after_two_passes() {
        assert_eq!(decode("&amp;amp;amp;"), "&amp;");
    }

    #[test]
    fn test_unknown_and_invalid_references_are_kept() {
        assert_eq!(decode("&copy; 2024"), "&copy; 2024");
        assert_eq!(decode("&#xD800;"), "&#xD800;");
        assert_eq!(decode("&#99999999999;"), "&#99999999999;");
        assert_eq!(decode("fish & chips"), "fish & chips");
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        assert_eq!(decode("Normal text"), "Normal text");
        assert_eq!(decode(""), "");
    }

    #[test]
    fn test_single_pass() {
        assert_eq!(decode_once("&amp;#39;"), "&#39;");
    }
}
