//! Note repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

use reelnotes_core::{
    classify_str, normalize_str, ContentType, CreateNoteRequest, Error, Note, NoteRepository,
    Result, UpdateNoteRequest, UNTITLED_NOTE,
};

const NOTE_COLUMNS: &str = "id, url, title, content_type, structured_text, raw_transcript, raw_ocr, \
                            status, created_at, updated_at";

const NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

/// SQLite implementation of NoteRepository.
pub struct SqliteNoteRepository {
    pool: Pool<Sqlite>,
}

impl SqliteNoteRepository {
    /// Create a new SqliteNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Fixed-width RFC 3339 so stored timestamps sort lexicographically.
    fn timestamp(at: DateTime<Utc>) -> String {
        at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
    }

    async fn query_notes(&self, sql: &str) -> Result<Vec<Note>> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        rows.iter().map(map_row_to_note).collect()
    }
}

fn map_row_to_note(row: &SqliteRow) -> Result<Note> {
    let content_type: String = row.try_get("content_type")?;
    let status: String = row.try_get("status")?;
    let title: String = row.try_get("title")?;
    let structured_text: Option<String> = row.try_get("structured_text")?;

    Ok(Note {
        id: row.try_get("id")?,
        url: row.try_get("url")?,
        title: normalize_str(&title, UNTITLED_NOTE),
        // Rows written by older clients may hold free-form labels
        content_type: content_type
            .parse()
            .unwrap_or_else(|_| classify_str(&content_type)),
        structured_text: structured_text.unwrap_or_default(),
        raw_transcript: row.try_get("raw_transcript")?,
        raw_ocr: row.try_get("raw_ocr")?,
        status: status.parse().unwrap_or_default(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Unicode-aware, case-insensitive substring match on title or body.
/// `needle` must already be lowercased.
fn matches_query(note: &Note, needle: &str) -> bool {
    note.title.to_lowercase().contains(needle)
        || note.structured_text.to_lowercase().contains(needle)
}

#[async_trait]
impl NoteRepository for SqliteNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<i64> {
        let now = Self::timestamp(Utc::now());
        let result = sqlx::query(
            "INSERT INTO notes (url, title, content_type, structured_text, raw_transcript, raw_ocr,
                                status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(req.url.trim())
        .bind(normalize_str(&req.title, UNTITLED_NOTE))
        .bind(req.content_type.label())
        .bind(normalize_str(&req.structured_text, ""))
        .bind(req.raw_transcript)
        .bind(req.raw_ocr)
        .bind(req.status.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        let id = result.last_insert_rowid();
        debug!(subsystem = "database", component = "notes", op = "insert", note_id = id, "Note inserted");
        Ok(id)
    }

    async fn fetch(&self, id: i64) -> Result<Option<Note>> {
        let row = sqlx::query(&format!("SELECT {} FROM notes WHERE id = ?", NOTE_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.as_ref().map(map_row_to_note).transpose()
    }

    async fn list(&self) -> Result<Vec<Note>> {
        self.query_notes(&format!("SELECT {} FROM notes {}", NOTE_COLUMNS, NEWEST_FIRST))
            .await
    }

    async fn search(&self, query: &str) -> Result<Vec<Note>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list().await;
        }

        // SQLite LIKE only folds ASCII, so matching happens after the read
        let needle = query.to_lowercase();
        let mut notes = self.list().await?;
        notes.retain(|note| matches_query(note, &needle));

        debug!(
            subsystem = "database",
            component = "notes",
            op = "search",
            query,
            result_count = notes.len(),
            "Note search complete"
        );
        Ok(notes)
    }

    async fn list_by_content_type(&self, content_type: ContentType) -> Result<Vec<Note>> {
        // Filter on the mapped type so stored free-form labels agree with reads
        let mut notes = self.list().await?;
        notes.retain(|note| note.content_type == content_type);
        Ok(notes)
    }

    async fn update(&self, id: i64, req: UpdateNoteRequest) -> Result<()> {
        if !self.exists(id).await? {
            return Err(Error::NoteNotFound(id));
        }

        let mut updates: Vec<&str> = vec!["updated_at = ?"];
        let mut values: Vec<String> = vec![Self::timestamp(Utc::now())];

        if let Some(url) = req.url {
            updates.push("url = ?");
            values.push(url.trim().to_string());
        }
        if let Some(title) = req.title {
            updates.push("title = ?");
            values.push(normalize_str(&title, UNTITLED_NOTE));
        }
        if let Some(content_type) = req.content_type {
            updates.push("content_type = ?");
            values.push(content_type.label().to_string());
        }
        if let Some(text) = req.structured_text {
            updates.push("structured_text = ?");
            values.push(normalize_str(&text, ""));
        }
        if let Some(transcript) = req.raw_transcript {
            updates.push("raw_transcript = ?");
            values.push(transcript);
        }
        if let Some(ocr) = req.raw_ocr {
            updates.push("raw_ocr = ?");
            values.push(ocr);
        }
        if let Some(status) = req.status {
            updates.push("status = ?");
            values.push(status.to_string());
        }

        let sql = format!("UPDATE notes SET {} WHERE id = ?", updates.join(", "));
        let mut query = sqlx::query(&sql);
        for value in values {
            query = query.bind(value);
        }
        query
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "update",
            note_id = id,
            fields = updates.len() - 1,
            "Note updated"
        );
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }
        debug!(subsystem = "database", component = "notes", op = "delete", note_id = id, "Note deleted");
        Ok(())
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM notes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(found.is_some())
    }
}
