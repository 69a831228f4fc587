//! Core data models for reelnotes.
//!
//! These types are shared across all reelnotes crates and represent
//! the core domain entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// URL recorded for notes created by hand rather than from a reel.
pub const MANUAL_ENTRY_URL: &str = "Manual Entry";

/// Title used whenever no usable title can be derived.
pub const UNTITLED_NOTE: &str = "Untitled Note";

// =============================================================================
// CONTENT TYPE
// =============================================================================

/// Closed set of categories a note can be filed under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    Recipe,
    Workout,
    Travel,
    Educational,
    #[serde(rename = "DIY")]
    Diy,
    Other,
    /// Stored default for notes that have never been classified.
    #[default]
    Unspecified,
}

impl ContentType {
    /// Every content type, in canonical order.
    pub const ALL: [ContentType; 7] = [
        Self::Recipe,
        Self::Workout,
        Self::Travel,
        Self::Educational,
        Self::Diy,
        Self::Other,
        Self::Unspecified,
    ];

    /// Canonical display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Recipe => "Recipe",
            Self::Workout => "Workout",
            Self::Travel => "Travel",
            Self::Educational => "Educational",
            Self::Diy => "DIY",
            Self::Other => "Other",
            Self::Unspecified => "Unspecified",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recipe" => Ok(Self::Recipe),
            "workout" => Ok(Self::Workout),
            "travel" => Ok(Self::Travel),
            "educational" => Ok(Self::Educational),
            "diy" => Ok(Self::Diy),
            "other" => Ok(Self::Other),
            "unspecified" => Ok(Self::Unspecified),
            _ => Err(format!("Invalid content type: {}", s)),
        }
    }
}

// =============================================================================
// NOTE TYPES
// =============================================================================

/// Lifecycle status of a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    #[default]
    Draft,
    Ready,
}

impl std::fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

impl std::str::FromStr for NoteStatus {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "ready" => Ok(Self::Ready),
            _ => Err(format!("Invalid note status: {}", s)),
        }
    }
}

/// A persisted note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub content_type: ContentType,
    pub structured_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_ocr: Option<String>,
    pub status: NoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request for creating a new note (a note without id and timestamps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub structured_text: String,
    #[serde(default)]
    pub raw_transcript: Option<String>,
    #[serde(default)]
    pub raw_ocr: Option<String>,
    #[serde(default)]
    pub status: NoteStatus,
}

impl CreateNoteRequest {
    /// Blank draft note, as created by the "create manually" flow.
    pub fn manual(url: Option<&str>) -> Self {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(MANUAL_ENTRY_URL);
        Self {
            url: url.to_string(),
            title: UNTITLED_NOTE.to_string(),
            content_type: ContentType::Other,
            structured_text: String::new(),
            raw_transcript: None,
            raw_ocr: None,
            status: NoteStatus::Draft,
        }
    }

    /// Ready note built from a formatted reel.
    pub fn from_formatted(url: &str, formatted: FormatResult, extraction: &ExtractionResult) -> Self {
        Self {
            url: url.trim().to_string(),
            title: formatted.title,
            content_type: formatted.content_type,
            structured_text: formatted.structured_text,
            raw_transcript: extraction.transcript.clone(),
            raw_ocr: extraction.ocr.clone(),
            status: NoteStatus::Ready,
        }
    }
}

/// Partial update of a note. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_ocr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NoteStatus>,
}

impl UpdateNoteRequest {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// =============================================================================
// PIPELINE TYPES
// =============================================================================

/// Output of the note formatter: the only artifact the pipeline produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatResult {
    pub title: String,
    pub content_type: ContentType,
    pub structured_text: String,
}

/// Result of extracting content from a reel URL.
///
/// `error` set means extraction failed; neither text field set and no
/// error means the reel had no usable content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    /// Successful extraction. Blank fields are dropped.
    pub fn found(transcript: Option<String>, ocr: Option<String>) -> Self {
        let keep = |s: Option<String>| s.filter(|t| !t.trim().is_empty());
        Self {
            transcript: keep(transcript),
            ocr: keep(ocr),
            error: None,
        }
    }

    /// Failed extraction.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            transcript: None,
            ocr: None,
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Text to format: the transcript, else the OCR text.
    pub fn content(&self) -> Option<&str> {
        self.transcript
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.ocr.as_deref().filter(|t| !t.trim().is_empty()))
    }

    pub fn has_content(&self) -> bool {
        self.content().is_some()
    }
}
