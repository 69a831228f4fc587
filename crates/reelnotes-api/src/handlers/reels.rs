//! Reel extraction and formatting handlers.
//!
//! `create_reel_note` is the full pipeline: validate the URL, extract the
//! caption, format it, and store a ready note with the raw text kept.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::{info, warn};

use reelnotes_core::{CreateNoteRequest, ExtractionResult, FormatResult, Note};
use reelnotes_extract::is_reel_url;

use super::notes::load_note;
use crate::{ApiError, AppState};

pub const EMPTY_URL_MESSAGE: &str = "Please enter an Instagram URL";
pub const INVALID_URL_MESSAGE: &str = "Please enter a valid Instagram reel or post URL";
pub const NO_CONTENT_MESSAGE: &str =
    "Could not extract content from this reel. You can still create a note manually.";
pub const EMPTY_TRANSCRIPT_MESSAGE: &str = "Please provide a transcript to format";

#[derive(Debug, Deserialize)]
pub struct ReelRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct FormatRequest {
    #[serde(default)]
    pub transcript: String,
}

fn validate_reel_url(url: &str) -> Result<&str, ApiError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ApiError::BadRequest(EMPTY_URL_MESSAGE.to_string()));
    }
    if !is_reel_url(url) {
        return Err(ApiError::BadRequest(INVALID_URL_MESSAGE.to_string()));
    }
    Ok(url)
}

async fn extract(state: &AppState, url: &str) -> Result<ExtractionResult, ApiError> {
    let result = state.extractor.extract(url).await;
    match result.error {
        Some(error) => {
            warn!(
                subsystem = "api",
                extractor = state.extractor.name(),
                error = %error,
                "Extraction failed"
            );
            Err(ApiError::BadGateway(error))
        }
        None => Ok(result),
    }
}

/// Extract caption and on-screen text from a reel.
pub async fn extract_reel(
    State(state): State<AppState>,
    Json(body): Json<ReelRequest>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let url = validate_reel_url(&body.url)?;
    Ok(Json(extract(&state, url).await?))
}

/// Format a caption into a note preview without storing it.
pub async fn format_transcript(
    State(state): State<AppState>,
    Json(body): Json<FormatRequest>,
) -> Result<Json<FormatResult>, ApiError> {
    if body.transcript.trim().is_empty() {
        return Err(ApiError::BadRequest(EMPTY_TRANSCRIPT_MESSAGE.to_string()));
    }
    Ok(Json(state.formatter.format_note(&body.transcript).await))
}

/// Extract, format and store a reel as a ready note.
pub async fn create_reel_note(
    State(state): State<AppState>,
    Json(body): Json<ReelRequest>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let url = validate_reel_url(&body.url)?;
    let extraction = extract(&state, url).await?;

    let Some(content) = extraction.content() else {
        return Err(ApiError::Unprocessable(NO_CONTENT_MESSAGE.to_string()));
    };

    let formatted = state.formatter.format_note(content).await;
    let id = state
        .notes
        .insert(CreateNoteRequest::from_formatted(url, formatted, &extraction))
        .await?;

    info!(subsystem = "api", op = "create_reel_note", note_id = id, "Reel note created");
    Ok((StatusCode::CREATED, Json(load_note(&state, id).await?)))
}
