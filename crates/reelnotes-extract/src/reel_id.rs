//! Instagram reel URL parsing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Path prefixes that identify a reel-like post, checked in order.
const REEL_PATHS: [&str; 3] = ["reel", "p", "tv"];

static REEL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    REEL_PATHS
        .iter()
        .map(|kind| Regex::new(&format!(r"instagram\.com/{}/([A-Za-z0-9_-]+)", kind)).unwrap())
        .collect()
});

/// Extract the shortcode from an Instagram reel, post or IGTV URL.
///
/// ```
/// use reelnotes_extract::extract_reel_id;
///
/// assert_eq!(
///     extract_reel_id("https://www.instagram.com/reel/C1a2B3c_-4/?igsh=x"),
///     Some("C1a2B3c_-4".to_string())
/// );
/// assert_eq!(extract_reel_id("https://example.com/reel/abc"), None);
/// ```
pub fn extract_reel_id(url: &str) -> Option<String> {
    REEL_PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// True when the URL carries a reel shortcode.
pub fn is_reel_url(url: &str) -> bool {
    extract_reel_id(url).is_some()
}

/// Canonical reel URL for a shortcode, as accepted by oEmbed.
pub fn canonical_reel_url(reel_id: &str) -> String {
    format!("https://www.instagram.com/reel/{}/", reel_id)
}
