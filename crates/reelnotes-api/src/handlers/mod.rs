//! HTTP handlers for reelnotes-api.

pub mod notes;
pub mod reels;
