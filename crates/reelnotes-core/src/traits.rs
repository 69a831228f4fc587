//! Core traits for reelnotes abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// NOTE REPOSITORY TRAITS
// =============================================================================

/// Repository for note CRUD operations.
///
/// Listing operations return notes newest first.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note, returning its id.
    async fn insert(&self, req: CreateNoteRequest) -> Result<i64>;

    /// Fetch a note by id.
    async fn fetch(&self, id: i64) -> Result<Option<Note>>;

    /// List all notes.
    async fn list(&self) -> Result<Vec<Note>>;

    /// Case-insensitive substring search over title and structured text.
    async fn search(&self, query: &str) -> Result<Vec<Note>>;

    /// List notes filed under one content type.
    async fn list_by_content_type(&self, content_type: ContentType) -> Result<Vec<Note>>;

    /// Apply a partial update. Always refreshes `updated_at`.
    async fn update(&self, id: i64, req: UpdateNoteRequest) -> Result<()>;

    /// Permanently delete a note.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Check if a note exists.
    async fn exists(&self, id: i64) -> Result<bool>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for text generation (chat completion).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;

    /// Check if the backend is available and responding.
    async fn health_check(&self) -> Result<bool>;
}

// =============================================================================
// EXTRACTION TRAITS
// =============================================================================

/// Service that pulls caption and on-screen text out of a reel URL.
///
/// Failures are reported inside the returned [`ExtractionResult`] rather than
/// as `Err`, so callers can tell "failed" from "nothing found".
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Extract content for the given URL.
    async fn extract(&self, url: &str) -> ExtractionResult;

    /// Human-readable name of this extractor.
    fn name(&self) -> &str;
}
