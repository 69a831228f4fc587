//! Centralized default constants for reelnotes.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// FORMATTING
// =============================================================================

/// Maximum title length (in characters) requested from the model and
/// applied to fallback titles.
pub const TITLE_MAX_CHARS: usize = 50;

// =============================================================================
// INFERENCE
// =============================================================================

/// Default OpenAI-compatible completion endpoint (Groq).
pub const COMPLETION_URL: &str = "https://api.groq.com/openai/v1";

/// Default generation model name.
pub const GEN_MODEL: &str = "llama-3.3-70b-versatile";

/// Sampling temperature for note formatting.
pub const GEN_TEMPERATURE: f32 = 0.7;

/// Token cap for a formatted note.
pub const GEN_MAX_TOKENS: u32 = 1024;

/// Timeout for generation requests in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// EXTRACTION
// =============================================================================

/// Default RapidAPI host for the Instagram scraper.
pub const RAPID_API_HOST: &str = "instagram-downloader-v2-scraper-reels-igtv-posts-stories.p.rapidapi.com";

/// Public Instagram oEmbed endpoint used when the scraper yields nothing.
pub const OEMBED_URL: &str = "https://api.instagram.com/oembed/";

/// Timeout for extraction requests in seconds.
pub const EXTRACT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// DATABASE
// =============================================================================

/// Default SQLite database URL (created on first use).
pub const DATABASE_URL: &str = "sqlite://reelnotes.db?mode=rwc";

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default CORS max-age in seconds (1 hour).
pub const CORS_MAX_AGE_SECS: u64 = 3600;

/// Maximum request body size in bytes (1 MB; requests carry URLs and text only).
pub const MAX_BODY_SIZE_BYTES: usize = 1024 * 1024;
