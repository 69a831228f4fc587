//! Text normalization for untrusted JSON payloads.
//!
//! Model replies and scraper payloads arrive in whatever shape the remote
//! side felt like producing: a string, an array of strings, an object with
//! `section`/`content` pairs, an object wrapping `sections`, or an arbitrary
//! nested mapping. [`normalize`] folds any of these into one flat display
//! string, substituting a caller-supplied fallback when nothing usable is
//! left.
//!
//! ## Rules
//!
//! | Shape | Result |
//! |-------|--------|
//! | string | trimmed text, or fallback when blank |
//! | null / absent | fallback |
//! | array | non-empty normalized elements joined by a blank line |
//! | object with `section` or `content` | `section` and `content` joined by a newline |
//! | object with array `sections` | same as the array |
//! | any other object | `"<key>\n<value>"` blocks joined by a blank line |
//! | number / bool | string form |
//!
//! Normalization is total: it never panics and always returns a string.

use serde_json::{Map, Value};

/// Separator between normalized array elements.
pub const SEQUENCE_SEPARATOR: &str = "\n\n";

/// Separator between a section heading and its content.
pub const SECTION_SEPARATOR: &str = "\n";

/// Separator between key blocks of a generic object.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// How objects without a recognized shape are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObjectStyle {
    /// One `"<key>\n<value>"` block per non-empty entry.
    #[default]
    KeyBlocks,
    /// Legacy rendering: the whole object as pretty-printed JSON.
    PrettyJson,
}

/// Shape of a value, in match precedence order.
#[derive(Debug)]
enum Shape<'a> {
    Text(&'a str),
    Missing,
    Sequence(&'a [Value]),
    Section {
        section: Option<&'a Value>,
        content: Option<&'a Value>,
    },
    Sections(&'a [Value]),
    Mapping(&'a Map<String, Value>),
    Scalar(&'a Value),
}

impl<'a> Shape<'a> {
    fn of(value: &'a Value) -> Self {
        match value {
            Value::String(s) => Shape::Text(s),
            Value::Null => Shape::Missing,
            Value::Array(items) => Shape::Sequence(items),
            Value::Object(map) if map.contains_key("section") || map.contains_key("content") => {
                Shape::Section {
                    section: map.get("section"),
                    content: map.get("content"),
                }
            }
            Value::Object(map) => match map.get("sections") {
                Some(Value::Array(items)) => Shape::Sections(items),
                _ => Shape::Mapping(map),
            },
            Value::Bool(_) | Value::Number(_) => Shape::Scalar(value),
        }
    }
}

/// Configurable normalizer. [`normalize`] uses the default configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    object_style: ObjectStyle,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how generic objects are rendered.
    pub fn with_object_style(mut self, style: ObjectStyle) -> Self {
        self.object_style = style;
        self
    }

    pub fn object_style(&self) -> ObjectStyle {
        self.object_style
    }

    /// Flatten `value` into display text, or `fallback` when it holds nothing usable.
    pub fn normalize(&self, value: &Value, fallback: &str) -> String {
        match Shape::of(value) {
            Shape::Text(s) => non_empty_or(s.trim().to_string(), fallback),
            Shape::Missing => fallback.to_string(),
            Shape::Sequence(items) | Shape::Sections(items) => self.join_sequence(items, fallback),
            Shape::Section { section, content } => {
                let parts: Vec<String> = [section, content]
                    .into_iter()
                    .map(|part| self.normalize_opt(part, ""))
                    .filter(|part| !part.is_empty())
                    .collect();
                non_empty_or(parts.join(SECTION_SEPARATOR), fallback)
            }
            Shape::Mapping(map) => match self.object_style {
                ObjectStyle::KeyBlocks => self.join_blocks(map, fallback),
                ObjectStyle::PrettyJson => {
                    serde_json::to_string_pretty(map).unwrap_or_else(|_| fallback.to_string())
                }
            },
            Shape::Scalar(v) => scalar_to_string(v),
        }
    }

    /// Like [`Normalizer::normalize`], treating `None` as null.
    pub fn normalize_opt(&self, value: Option<&Value>, fallback: &str) -> String {
        match value {
            Some(v) => self.normalize(v, fallback),
            None => fallback.to_string(),
        }
    }

    fn join_sequence(&self, items: &[Value], fallback: &str) -> String {
        let parts: Vec<String> = items
            .iter()
            .map(|item| self.normalize(item, ""))
            .filter(|part| !part.is_empty())
            .collect();
        non_empty_or(parts.join(SEQUENCE_SEPARATOR), fallback)
    }

    fn join_blocks(&self, map: &Map<String, Value>, fallback: &str) -> String {
        let blocks: Vec<String> = map
            .iter()
            .filter_map(|(key, value)| {
                let text = self.normalize(value, "");
                (!text.is_empty()).then(|| format!("{}\n{}", key, text))
            })
            .collect();
        non_empty_or(blocks.join(BLOCK_SEPARATOR), fallback)
    }
}

fn non_empty_or(text: String, fallback: &str) -> String {
    if text.is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                // f64 Display prints integral floats without a trailing ".0"
                n.as_f64().map(|f| f.to_string()).unwrap_or_else(|| n.to_string())
            }
        }
        other => other.to_string(),
    }
}

/// Normalize with the default configuration.
pub fn normalize(value: &Value, fallback: &str) -> String {
    Normalizer::default().normalize(value, fallback)
}

/// Normalize an optional value; `None` yields the fallback.
pub fn normalize_opt(value: Option<&Value>, fallback: &str) -> String {
    Normalizer::default().normalize_opt(value, fallback)
}

/// Normalize plain text: trimmed, or the fallback when blank.
pub fn normalize_str(text: &str, fallback: &str) -> String {
    non_empty_or(text.trim().to_string(), fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_strings_fall_back() {
        assert_eq!(normalize(&json!(""), "X"), "X");
        assert_eq!(normalize(&json!("  "), "X"), "X");
        assert_eq!(normalize(&json!("\n\t"), "X"), "X");
    }

    #[test]
    fn test_string_is_trimmed() {
        assert_eq!(normalize(&json!("  hello  "), "X"), "hello");
        assert_eq!(normalize(&json!("a\n b"), "X"), "a\n b");
    }

    #[test]
    fn test_null_and_absent_fall_back() {
        assert_eq!(normalize(&Value::Null, "X"), "X");
        assert_eq!(normalize_opt(None, "X"), "X");
    }

    #[test]
    fn test_empty_sequences_fall_back() {
        assert_eq!(normalize(&json!([]), "X"), "X");
        assert_eq!(normalize(&json!(["", " "]), "X"), "X");
        assert_eq!(normalize(&json!([null, [], {}]), "X"), "X");
    }

    #[test]
    fn test_sequence_joins_with_blank_line() {
        assert_eq!(normalize(&json!(["a", " ", "b"]), "X"), "a\n\nb");
        assert_eq!(normalize(&json!([1, true, "c"]), "X"), "1\n\ntrue\n\nc");
    }

    #[test]
    fn test_section_shape() {
        let value = json!({"section": "Intro", "content": "Body"});
        assert_eq!(normalize(&value, "X"), "Intro\nBody");
    }

    #[test]
    fn test_section_shape_skips_empty_parts() {
        assert_eq!(normalize(&json!({"section": "Intro"}), "X"), "Intro");
        assert_eq!(normalize(&json!({"content": ["a", "b"]}), "X"), "a\n\nb");
        assert_eq!(normalize(&json!({"section": " ", "content": null}), "X"), "X");
    }

    #[test]
    fn test_section_shape_is_chosen_by_key_presence() {
        // Other keys are dropped once `section` or `content` is present
        let value = json!({"title": "T", "content": null});
        assert_eq!(normalize(&value, "X"), "X");
        assert_eq!(normalize(&json!({"title": "T", "section": ""}), "X"), "X");
        assert_eq!(normalize(&json!({"title": "T"}), "X"), "title\nT");
    }

    #[test]
    fn test_section_takes_precedence_over_sections() {
        let value = json!({"content": "Body", "sections": ["ignored"]});
        assert_eq!(normalize(&value, "X"), "Body");
    }

    #[test]
    fn test_sections_delegates_to_sequence() {
        let wrapped = json!({"sections": ["a", "b"]});
        assert_eq!(normalize(&wrapped, "X"), normalize(&json!(["a", "b"]), "X"));
        assert_eq!(normalize(&json!({"sections": []}), "X"), "X");
    }

    #[test]
    fn test_non_array_sections_is_generic_mapping() {
        let value = json!({"sections": "Just text"});
        assert_eq!(normalize(&value, "X"), "sections\nJust text");
    }

    #[test]
    fn test_generic_mapping_key_blocks_in_document_order() {
        let value: Value =
            serde_json::from_str(r#"{"Steps": ["Boil", "Drain"], "Ingredients": "Pasta", "Notes": ""}"#)
                .unwrap();
        assert_eq!(
            normalize(&value, "X"),
            "Steps\nBoil\n\nDrain\n\nIngredients\nPasta"
        );
    }

    #[test]
    fn test_generic_mapping_all_empty_falls_back() {
        assert_eq!(normalize(&json!({}), "X"), "X");
        assert_eq!(normalize(&json!({"a": "", "b": null}), "X"), "X");
    }

    #[test]
    fn test_pretty_json_object_style() {
        let normalizer = Normalizer::new().with_object_style(ObjectStyle::PrettyJson);
        let value = json!({"a": 1});
        assert_eq!(normalizer.normalize(&value, "X"), "{\n  \"a\": 1\n}");
        // Recognized shapes are unaffected by the object style
        assert_eq!(
            normalizer.normalize(&json!({"section": "S", "content": "C"}), "X"),
            "S\nC"
        );
    }

    #[test]
    fn test_scalars() {
        assert_eq!(normalize(&json!(42), "X"), "42");
        assert_eq!(normalize(&json!(-7), "X"), "-7");
        assert_eq!(normalize(&json!(1.5), "X"), "1.5");
        assert_eq!(normalize(&json!(2.0), "X"), "2");
        assert_eq!(normalize(&json!(false), "X"), "false");
    }

    #[test]
    fn test_deeply_nested_structure() {
        let value = json!({
            "sections": [
                {"section": "🍝 Ingredients", "content": ["Pasta", "Salt"]},
                {"section": "👩‍🍳 Steps", "content": {"1": "Boil", "2": "Drain"}},
                [[["deep"]]]
            ]
        });
        assert_eq!(
            normalize(&value, "X"),
            "🍝 Ingredients\nPasta\n\nSalt\n\n👩‍🍳 Steps\n1\nBoil\n\n2\nDrain\n\ndeep"
        );
    }

    #[test]
    fn test_totality_over_mixed_shapes() {
        let inputs = vec![
            json!(null),
            json!(true),
            json!(0),
            json!(""),
            json!([null, 1, "x", {"k": [{}]}]),
            json!({"content": {"section": {"sections": [null]}}}),
            json!({"a": {"b": {"c": {"d": []}}}}),
        ];
        for input in inputs {
            let out = normalize(&input, "fallback");
            assert!(!out.is_empty(), "non-empty fallback must never vanish: {input}");
        }
    }

    #[test]
    fn test_idempotent_for_strings() {
        for raw in ["  hello  ", "", "a\n\nb", "  \n  ", "🍝 Pasta"] {
            let once = normalize(&json!(raw), "F");
            let twice = normalize(&json!(once.clone()), "F");
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_normalize_str() {
        assert_eq!(normalize_str("  t  ", "F"), "t");
        assert_eq!(normalize_str("   ", "F"), "F");
    }
}
