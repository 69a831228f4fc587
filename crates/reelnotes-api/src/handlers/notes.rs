//! Note CRUD handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use reelnotes_core::{ContentType, CreateNoteRequest, Note, UpdateNoteRequest};

use crate::{ApiError, AppState};

/// Query parameters for listing notes.
#[derive(Debug, Default, Deserialize)]
pub struct ListNotesQuery {
    /// Case-insensitive substring matched against title and body.
    pub q: Option<String>,
    /// Restrict to one content type label.
    pub content_type: Option<String>,
}

/// Body for creating a note by hand. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct CreateNoteBody {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content_type: Option<ContentType>,
    #[serde(default)]
    pub structured_text: Option<String>,
}

pub(crate) async fn load_note(state: &AppState, id: i64) -> Result<Note, ApiError> {
    state
        .notes
        .fetch(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Note not found: {}", id)))
}

/// List notes, newest first.
///
/// `q` searches, `content_type` filters; both may be combined.
pub async fn list_notes(
    State(state): State<AppState>,
    Query(query): Query<ListNotesQuery>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let content_type = query
        .content_type
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<ContentType>().map_err(ApiError::BadRequest))
        .transpose()?;
    let search = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());

    let notes = match (search, content_type) {
        (Some(q), Some(ct)) => {
            let mut notes = state.notes.search(q).await?;
            notes.retain(|n| n.content_type == ct);
            notes
        }
        (Some(q), None) => state.notes.search(q).await?,
        (None, Some(ct)) => state.notes.list_by_content_type(ct).await?,
        (None, None) => state.notes.list().await?,
    };
    Ok(Json(notes))
}

/// Create a draft note by hand.
pub async fn create_note(
    State(state): State<AppState>,
    Json(body): Json<CreateNoteBody>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let mut req = CreateNoteRequest::manual(body.url.as_deref());
    if let Some(title) = body.title {
        req.title = title;
    }
    if let Some(content_type) = body.content_type {
        req.content_type = content_type;
    }
    if let Some(text) = body.structured_text {
        req.structured_text = text;
    }

    let id = state.notes.insert(req).await?;
    info!(subsystem = "api", op = "create_note", note_id = id, "Manual note created");
    Ok((StatusCode::CREATED, Json(load_note(&state, id).await?)))
}

/// Get a note by id.
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(load_note(&state, id).await?))
}

/// Apply a partial update and return the updated note.
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<Json<Note>, ApiError> {
    state.notes.update(id, req).await?;
    Ok(Json(load_note(&state, id).await?))
}

/// Delete a note.
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.notes.delete(id).await?;
    info!(subsystem = "api", op = "delete_note", note_id = id, "Note deleted");
    Ok(StatusCode::NO_CONTENT)
}
