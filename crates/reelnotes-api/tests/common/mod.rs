//! Shared harness: router over an in-memory store with stub collaborators.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use reelnotes_api::{app, AppState};
use reelnotes_core::{ContentExtractor, ExtractionResult};
use reelnotes_db::{Database, SqliteNoteRepository};
use reelnotes_inference::mock::MockGenerationBackend;
use reelnotes_inference::NoteFormatter;

/// Extractor returning a canned result and recording the URLs it saw.
#[derive(Clone, Default)]
pub struct StubExtractor {
    result: ExtractionResult,
    seen: Arc<Mutex<Vec<String>>>,
}

impl StubExtractor {
    pub fn returning(result: ExtractionResult) -> Self {
        Self {
            result,
            seen: Arc::default(),
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentExtractor for StubExtractor {
    async fn extract(&self, url: &str) -> ExtractionResult {
        self.seen.lock().unwrap().push(url.to_string());
        self.result.clone()
    }

    fn name(&self) -> &str {
        "stub"
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: Database,
    pub extractor: StubExtractor,
    pub backend: MockGenerationBackend,
}

pub async fn test_app(extractor: StubExtractor, backend: MockGenerationBackend) -> TestApp {
    let db = Database::in_memory().await.expect("in-memory database");
    let state = AppState::new(
        Arc::new(SqliteNoteRepository::new(db.pool.clone())),
        Arc::new(extractor.clone()),
        NoteFormatter::new(Arc::new(backend.clone())),
    );
    TestApp {
        router: app(state),
        db,
        extractor,
        backend,
    }
}

pub async fn default_app() -> TestApp {
    test_app(StubExtractor::default(), MockGenerationBackend::new()).await
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        self.request(Method::POST, uri, Some(body)).await
    }
}
