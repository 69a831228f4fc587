//! # reelnotes-core
//!
//! Core types, traits, and the normalization pipeline for reelnotes.
//!
//! This crate provides the note data model, the collaborator traits the
//! other crates implement, and the two pure pieces of the pipeline:
//!
//! - [`normalize`]: fold any JSON shape into display text
//! - [`classify`]: map a free-form category label onto [`ContentType`]

pub mod classify;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod traits;

// Re-export commonly used types at crate root
pub use classify::{classify, classify_str, CONTENT_TYPE_KEYWORDS};
pub use error::{Error, Result};
pub use models::*;
pub use normalize::{normalize, normalize_opt, normalize_str, Normalizer, ObjectStyle};
pub use traits::*;
