//! Caption and on-screen text probing over scraper payloads.
//!
//! Scraper providers disagree on where the caption lives. Each probe is a
//! path into the payload; the first one that resolves to non-blank text wins.

use serde_json::Value;

/// One step in a probe path.
#[derive(Debug, Clone, Copy)]
enum Step {
    Key(&'static str),
    Index(usize),
}

use Step::{Index, Key};

/// Caption locations, in priority order.
const CAPTION_PROBES: &[&[Step]] = &[
    &[Key("media"), Index(0), Key("caption")],
    &[Key("caption")],
    &[Key("caption"), Key("text")],
    &[Key("description")],
    &[Key("title")],
    &[Key("text")],
    &[
        Key("edge_media_to_caption"),
        Key("edges"),
        Index(0),
        Key("node"),
        Key("text"),
    ],
    &[Key("items"), Index(0), Key("caption"), Key("text")],
    &[
        Key("graphql"),
        Key("shortcode_media"),
        Key("edge_media_to_caption"),
        Key("edges"),
        Index(0),
        Key("node"),
        Key("text"),
    ],
];

/// Accessibility / alt text locations, in priority order.
const OCR_PROBES: &[&[Step]] = &[&[Key("accessibility_caption")], &[Key("alt_text")]];

fn resolve<'a>(payload: &'a Value, path: &[Step]) -> Option<&'a Value> {
    path.iter().try_fold(payload, |value, step| match step {
        Key(key) => value.get(*key),
        Index(i) => value.get(*i),
    })
}

fn first_text(payload: &Value, probes: &[&[Step]]) -> Option<String> {
    probes
        .iter()
        .filter_map(|path| resolve(payload, path))
        .filter_map(Value::as_str)
        .find(|text| !text.trim().is_empty())
        .map(str::to_string)
}

/// Find the post caption in a scraper payload.
pub fn find_caption(payload: &Value) -> Option<String> {
    first_text(payload, CAPTION_PROBES)
}

/// Find accessibility or alt text in a scraper payload.
pub fn find_ocr(payload: &Value) -> Option<String> {
    first_text(payload, OCR_PROBES)
}
