use once_cell::sync::Lazy;
use regex::Regex;

static BARE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

static URL_PATTERNS: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        Regex::new(r"youtube\.com/watch\?.*v=([A-Za-z0-9_-]{11})").unwrap(),
        Regex::new(r"youtu\.be/([A-Za-z0-9_-]{11})").unwrap(),
        Regex::new(r"youtube\.com/embed/([A-Za-z0-9_-]{11})").unwrap(),
        Regex::new(r"youtube\.com/shorts/([A-Za-z0-9_-]{11})").unwrap(),
    ]
});

/// Extract the 11-character video id from a URL or a bare id.
///
/// Returns `None` when the input matches no known form; callers treat that
/// as a fatal invalid-input error before any network call is made.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    if BARE_ID.is_match(input) {
        return Some(input.to_string());
    }

    URL_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(input).map(|caps| caps[1].to_string()))
}
