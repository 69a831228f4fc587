//! # reelnotes-inference
//!
//! Completion backend and note formatter for reelnotes.
//!
//! This crate provides:
//! - [`OpenAIBackend`]: a [`GenerationBackend`] for any OpenAI-compatible
//!   chat completions endpoint (Groq by default)
//! - [`NoteFormatter`]: prompt construction, reply parsing and the
//!   caption fallback
//! - `mock::MockGenerationBackend` (feature `mock`) for tests in dependent crates
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use reelnotes_inference::{NoteFormatter, OpenAIBackend};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OpenAIBackend::from_env().unwrap();
//!     let formatter = NoteFormatter::new(Arc::new(backend));
//!     let note = formatter.format_note("Pasta night\nBoil water...").await;
//!     println!("{} ({})", note.title, note.content_type);
//! }
//! ```

pub mod formatter;
pub mod openai;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use formatter::{build_prompt, extract_json, fallback_result, NoteFormatter, SYSTEM_PROMPT};
pub use openai::{OpenAIBackend, OpenAIConfig};

// Re-export core types
pub use reelnotes_core::{FormatResult, GenerationBackend};
