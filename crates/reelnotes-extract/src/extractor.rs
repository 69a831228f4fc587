//! Reel content extractor: RapidAPI scraper with an oEmbed fallback.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use reelnotes_core::{defaults, ContentExtractor, Error, ExtractionResult, Result};

use crate::caption::{find_caption, find_ocr};
use crate::reel_id::{canonical_reel_url, extract_reel_id};

/// Error reported for a blank URL.
pub const MISSING_URL: &str = "Missing URL parameter";

/// Error reported for a URL without a reel shortcode.
pub const INVALID_REEL_URL: &str = "Invalid Instagram reel URL";

/// Configuration for [`ReelExtractor`].
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// RapidAPI key. The scraper is skipped when unset.
    pub rapid_api_key: Option<String>,
    /// Value sent as `x-rapidapi-host`.
    pub rapid_api_host: String,
    /// Scraper base URL. Defaults to `https://{rapid_api_host}`.
    pub rapid_api_base_url: String,
    /// oEmbed endpoint.
    pub oembed_url: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            rapid_api_key: None,
            rapid_api_host: defaults::RAPID_API_HOST.to_string(),
            rapid_api_base_url: format!("https://{}", defaults::RAPID_API_HOST),
            oembed_url: defaults::OEMBED_URL.to_string(),
            timeout_seconds: defaults::EXTRACT_TIMEOUT_SECS,
        }
    }
}

impl ExtractorConfig {
    /// Create from environment variables.
    ///
    /// Reads `RAPID_API_KEY`, `RAPID_API_HOST`, `RAPID_API_BASE_URL`,
    /// `INSTAGRAM_OEMBED_URL` and `EXTRACT_TIMEOUT`.
    pub fn from_env() -> Self {
        let rapid_api_host =
            std::env::var("RAPID_API_HOST").unwrap_or_else(|_| defaults::RAPID_API_HOST.to_string());
        let rapid_api_base_url = std::env::var("RAPID_API_BASE_URL")
            .unwrap_or_else(|_| format!("https://{}", rapid_api_host));

        Self {
            rapid_api_key: std::env::var("RAPID_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            rapid_api_host,
            rapid_api_base_url,
            oembed_url: std::env::var("INSTAGRAM_OEMBED_URL")
                .unwrap_or_else(|_| defaults::OEMBED_URL.to_string()),
            timeout_seconds: std::env::var("EXTRACT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::EXTRACT_TIMEOUT_SECS),
        }
    }
}

/// Extracts captions from Instagram reels.
pub struct ReelExtractor {
    client: Client,
    config: ExtractorConfig,
}

impl ReelExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Extraction(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "extract",
            component = "reel_extractor",
            scraper_enabled = config.rapid_api_key.is_some(),
            oembed_url = %config.oembed_url,
            "Initializing reel extractor"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ExtractorConfig::from_env())
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Query the RapidAPI scraper. Any failure yields `(None, None)`.
    async fn scrape(&self, api_key: &str, url: &str) -> (Option<String>, Option<String>) {
        let endpoint = format!(
            "{}/get-post?url={}",
            self.config.rapid_api_base_url.trim_end_matches('/'),
            urlencoding::encode(url)
        );

        let payload = match self
            .get_json(
                self.client
                    .get(&endpoint)
                    .header("x-rapidapi-key", api_key)
                    .header("x-rapidapi-host", &self.config.rapid_api_host),
            )
            .await
        {
            Ok(payload) => payload,
            Err(e) => {
                warn!(subsystem = "extract", op = "scrape", error = %e, fallback = true, "Scraper request failed");
                return (None, None);
            }
        };

        let caption = find_caption(&payload);
        let ocr = find_ocr(&payload);
        debug!(
            subsystem = "extract",
            op = "scrape",
            caption_found = caption.is_some(),
            ocr_found = ocr.is_some(),
            "Scraper payload probed"
        );
        (caption, ocr)
    }

    /// Query the public oEmbed endpoint for the post title.
    async fn oembed(&self, reel_id: &str) -> Option<String> {
        let request = self
            .client
            .get(&self.config.oembed_url)
            .query(&[("url", canonical_reel_url(reel_id))]);

        match self.get_json(request).await {
            Ok(payload) => payload
                .get("title")
                .and_then(Value::as_str)
                .filter(|t| !t.trim().is_empty())
                .map(str::to_string),
            Err(e) => {
                warn!(subsystem = "extract", op = "oembed", reel_id, error = %e, "oEmbed request failed");
                None
            }
        }
    }

    /// Send a request and parse a JSON body, rejecting error statuses and HTML.
    async fn get_json(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Extraction(format!(
                "returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }
        if body.trim_start().starts_with('<') {
            return Err(Error::Extraction("received HTML instead of JSON".to_string()));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ContentExtractor for ReelExtractor {
    async fn extract(&self, url: &str) -> ExtractionResult {
        let start = Instant::now();
        let url = url.trim();
        if url.is_empty() {
            return ExtractionResult::failed(MISSING_URL);
        }
        let Some(reel_id) = extract_reel_id(url) else {
            debug!(subsystem = "extract", url, "Rejected non-reel URL");
            return ExtractionResult::failed(INVALID_REEL_URL);
        };

        let (mut transcript, mut ocr) = (None, None);
        if let Some(api_key) = self.config.rapid_api_key.as_deref() {
            (transcript, ocr) = self.scrape(api_key, url).await;
        }

        if transcript.is_none() && ocr.is_none() {
            debug!(subsystem = "extract", reel_id = %reel_id, "Trying oEmbed fallback");
            transcript = self.oembed(&reel_id).await;
        }

        let result = ExtractionResult::found(transcript, ocr);
        info!(
            subsystem = "extract",
            op = "extract",
            reel_id = %reel_id,
            has_content = result.has_content(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Reel extraction complete"
        );
        result
    }

    fn name(&self) -> &str {
        "instagram-reel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractorConfig::default();
        assert!(config.rapid_api_key.is_none());
        assert_eq!(config.rapid_api_host, defaults::RAPID_API_HOST);
        assert_eq!(
            config.rapid_api_base_url,
            format!("https://{}", defaults::RAPID_API_HOST)
        );
        assert_eq!(config.oembed_url, "https://api.instagram.com/oembed/");
        assert_eq!(config.timeout_seconds, 30);
    }

    #[tokio::test]
    async fn test_blank_url_is_missing() {
        let extractor = ReelExtractor::new(ExtractorConfig::default()).unwrap();
        let result = extractor.extract("   ").await;
        assert_eq!(result.error.as_deref(), Some(MISSING_URL));
    }

    #[tokio::test]
    async fn test_non_reel_url_is_invalid() {
        let extractor = ReelExtractor::new(ExtractorConfig::default()).unwrap();
        let result = extractor.extract("https://example.com/video/1").await;
        assert_eq!(result.error.as_deref(), Some(INVALID_REEL_URL));
        assert!(result.transcript.is_none());
        assert_eq!(extractor.name(), "instagram-reel");
    }
}
