//! Extractor tests against stubbed scraper and oEmbed endpoints.

use reelnotes_core::ContentExtractor;
use reelnotes_extract::{ExtractorConfig, ReelExtractor};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REEL_URL: &str = "https://www.instagram.com/reel/C0ffee_42/?igsh=abc";

fn extractor(scraper: &MockServer, oembed: &MockServer, api_key: Option<&str>) -> ReelExtractor {
    ReelExtractor::new(ExtractorConfig {
        rapid_api_key: api_key.map(str::to_string),
        rapid_api_host: "scraper.test".to_string(),
        rapid_api_base_url: scraper.uri(),
        oembed_url: format!("{}/oembed/", oembed.uri()),
        timeout_seconds: 5,
    })
    .expect("Failed to create extractor")
}

async fn mount_oembed(server: &MockServer, title: &str) {
    Mock::given(method("GET"))
        .and(path("/oembed/"))
        .and(query_param("url", "https://www.instagram.com/reel/C0ffee_42/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "title": title,
            "author_name": "chef"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_scraper_caption_and_alt_text() {
    let scraper = MockServer::start().await;
    let oembed = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get-post"))
        .and(query_param("url", REEL_URL))
        .and(header("x-rapidapi-key", "rapid-key"))
        .and(header("x-rapidapi-host", "scraper.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "media": [{"caption": "Pasta night 🍝\nBoil water", "is_video": true}],
            "alt_text": "A bowl of pasta",
            "owner": {"username": "chef"}
        })))
        .expect(1)
        .mount(&scraper)
        .await;

    // oEmbed must not be consulted when the scraper found content
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&oembed)
        .await;

    let result = extractor(&scraper, &oembed, Some("rapid-key"))
        .extract(REEL_URL)
        .await;

    assert!(result.error.is_none());
    assert_eq!(result.transcript.as_deref(), Some("Pasta night 🍝\nBoil water"));
    assert_eq!(result.ocr.as_deref(), Some("A bowl of pasta"));
}

#[tokio::test]
async fn test_html_scraper_body_falls_back_to_oembed() {
    let scraper = MockServer::start().await;
    let oembed = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get-post"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  <!DOCTYPE html><html></html>"))
        .mount(&scraper)
        .await;
    mount_oembed(&oembed, "Leg day routine").await;

    let result = extractor(&scraper, &oembed, Some("rapid-key"))
        .extract(REEL_URL)
        .await;

    assert_eq!(result.transcript.as_deref(), Some("Leg day routine"));
    assert!(result.ocr.is_none());
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_scraper_error_status_falls_back_to_oembed() {
    let scraper = MockServer::start().await;
    let oembed = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get-post"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&scraper)
        .await;
    mount_oembed(&oembed, "Beach day").await;

    let result = extractor(&scraper, &oembed, Some("rapid-key"))
        .extract(REEL_URL)
        .await;

    assert_eq!(result.transcript.as_deref(), Some("Beach day"));
}

#[tokio::test]
async fn test_without_api_key_only_oembed_is_used() {
    let scraper = MockServer::start().await;
    let oembed = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&scraper)
        .await;
    mount_oembed(&oembed, "Shelf build").await;

    let result = extractor(&scraper, &oembed, None).extract(REEL_URL).await;
    assert_eq!(result.transcript.as_deref(), Some("Shelf build"));
}

#[tokio::test]
async fn test_nothing_found_is_not_an_error() {
    let scraper = MockServer::start().await;
    let oembed = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/get-post"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"media": []})))
        .mount(&scraper)
        .await;
    Mock::given(method("GET"))
        .and(path("/oembed/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&oembed)
        .await;

    let result = extractor(&scraper, &oembed, Some("rapid-key"))
        .extract(REEL_URL)
        .await;

    assert!(result.error.is_none());
    assert!(!result.has_content());
    assert_eq!(serde_json::to_string(&result).unwrap(), "{}");
}

#[tokio::test]
async fn test_invalid_url_never_reaches_network() {
    let scraper = MockServer::start().await;
    let oembed = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&scraper)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&oembed)
        .await;

    let ex = extractor(&scraper, &oembed, Some("rapid-key"));
    assert_eq!(
        ex.extract("https://www.instagram.com/chef/").await.error.as_deref(),
        Some("Invalid Instagram reel URL")
    );
    assert_eq!(ex.extract("").await.error.as_deref(), Some("Missing URL parameter"));
}
