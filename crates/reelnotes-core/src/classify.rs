//! Content-type classification of free-form category labels.

use serde_json::Value;

use crate::models::ContentType;
use crate::normalize::normalize;

/// Keyword table, checked in order. The first keyword contained in the
/// lowercased label wins.
pub const CONTENT_TYPE_KEYWORDS: &[(&str, ContentType)] = &[
    ("recipe", ContentType::Recipe),
    ("workout", ContentType::Workout),
    ("travel", ContentType::Travel),
    ("educational", ContentType::Educational),
    ("diy", ContentType::Diy),
];

/// Map an arbitrary label value onto the closed content-type set.
///
/// Never returns [`ContentType::Unspecified`]; unmatched input is `Other`.
pub fn classify(value: &Value) -> ContentType {
    classify_str(&normalize(value, ContentType::Other.label()))
}

/// Classify an already-flat label.
pub fn classify_str(label: &str) -> ContentType {
    let text = label.to_lowercase();
    CONTENT_TYPE_KEYWORDS
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, content_type)| *content_type)
        .unwrap_or(ContentType::Other)
}
