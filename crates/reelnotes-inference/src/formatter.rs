//! Note formatter: turns a raw reel caption into a titled, classified note.
//!
//! The formatter asks the completion backend for a JSON object, pulls the
//! object out of whatever prose or code fences surround it, and maps its
//! fields through the normalizer and classifier. Every failure along the
//! way (transport, status, parse, wrong shape) degrades to a deterministic
//! fallback built from the caption itself, so [`NoteFormatter::format_note`]
//! never fails.

use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use reelnotes_core::defaults::TITLE_MAX_CHARS;
use reelnotes_core::{
    classify, normalize, normalize_opt, normalize_str, ContentType, Error, FormatResult,
    GenerationBackend, Result, UNTITLED_NOTE,
};

/// System message sent with every formatting request.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful note-formatting assistant. Always respond with valid JSON.";

/// Reply fields searched for the note body, in priority order.
const BODY_FIELDS: [&str; 3] = ["structuredText", "sections", "content"];

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").unwrap());

/// Build the formatting prompt with the caption embedded verbatim.
pub fn build_prompt(transcript: &str) -> String {
    format!(
        r#"You are a note-formatting AI. Format the following Instagram reel caption into a clean, organized note.

Rules:
1. Extract a short title (max {max} chars)
2. Detect content type: Recipe, Workout, Travel, Educational, DIY, or Other
3. Format with sections, bullet points, and emojis
4. If it's a recipe, structure as: Title, Type, Ingredients (bullet points), Instructions (numbered)
5. If it's a workout, structure as: Title, Type, Exercises (with sets/reps)
6. Keep it concise and readable

Caption:
{transcript}

Respond ONLY with valid JSON in this format:
{{
  "title": "Short title here",
  "contentType": "Recipe|Workout|Travel|Educational|DIY|Other",
  "structuredText": "Formatted text with sections and emojis"
}}"#,
        max = TITLE_MAX_CHARS,
        transcript = transcript,
    )
}

/// Locate the JSON payload inside a model reply.
///
/// Tries a ```` ```json ```` fence first, then the span from the first `{`
/// to the last `}`, then the whole reply.
pub fn extract_json(raw: &str) -> &str {
    if let Some(captures) = FENCED_JSON.captures(raw) {
        if let Some(body) = captures.get(1) {
            return body.as_str();
        }
    }

    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => raw,
    }
}

/// Parse a model reply into its JSON object.
pub fn parse_reply(raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(extract_json(raw))? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Serialization(format!(
            "Expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Map a parsed reply onto a [`FormatResult`].
pub fn map_reply(reply: &Map<String, Value>, transcript: &str) -> FormatResult {
    let title = normalize_opt(reply.get("title"), UNTITLED_NOTE);
    let content_type = reply
        .get("contentType")
        .map(classify)
        .unwrap_or(ContentType::Other);

    let body = BODY_FIELDS
        .iter()
        .filter_map(|field| reply.get(*field))
        .find(|value| !value.is_null());
    let structured_text = match body {
        Some(value) => normalize(value, transcript),
        None => normalize(&Value::Object(reply.clone()), transcript),
    };

    FormatResult {
        title,
        content_type,
        structured_text,
    }
}

/// Deterministic result built from the caption alone.
pub fn fallback_result(transcript: &str) -> FormatResult {
    let first_line = transcript.split('\n').next().unwrap_or_default();
    let truncated: String = first_line.chars().take(TITLE_MAX_CHARS).collect();

    FormatResult {
        title: normalize_str(&truncated, UNTITLED_NOTE),
        content_type: ContentType::Other,
        structured_text: normalize_str(transcript, ""),
    }
}

/// Formats captions through a completion backend.
#[derive(Clone)]
pub struct NoteFormatter {
    backend: Arc<dyn GenerationBackend>,
}

impl NoteFormatter {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn GenerationBackend> {
        &self.backend
    }

    /// Format a caption into a note. Never fails.
    pub async fn format_note(&self, transcript: &str) -> FormatResult {
        let start = Instant::now();
        match self.try_format(transcript).await {
            Ok(result) => {
                debug!(
                    subsystem = "inference",
                    component = "formatter",
                    op = "format_note",
                    model = %self.backend.model_name(),
                    content_type = %result.content_type,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Note formatted"
                );
                result
            }
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    component = "formatter",
                    op = "format_note",
                    model = %self.backend.model_name(),
                    error = %e,
                    fallback = true,
                    "Formatting failed, using caption fallback"
                );
                fallback_result(transcript)
            }
        }
    }

    async fn try_format(&self, transcript: &str) -> Result<FormatResult> {
        let prompt = build_prompt(transcript);
        let raw = self
            .backend
            .generate_with_system(SYSTEM_PROMPT, &prompt)
            .await?;
        let reply = parse_reply(&raw)?;
        Ok(map_reply(&reply, transcript))
    }
}
