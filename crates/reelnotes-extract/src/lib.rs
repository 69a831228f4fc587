//! # reelnotes-extract
//!
//! Pulls the caption and on-screen text out of an Instagram reel URL.
//!
//! [`ReelExtractor`] implements [`reelnotes_core::ContentExtractor`]. It asks
//! a RapidAPI scraper first (when a key is configured) and falls back to the
//! public oEmbed endpoint. Provider failures degrade to "no content"; only
//! a blank or non-reel URL produces an error result.

pub mod caption;
pub mod extractor;
pub mod reel_id;

pub use caption::{find_caption, find_ocr};
pub use extractor::{ExtractorConfig, ReelExtractor, INVALID_REEL_URL, MISSING_URL};
pub use reel_id::{canonical_reel_url, extract_reel_id, is_reel_url};
