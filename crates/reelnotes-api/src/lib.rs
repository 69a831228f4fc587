//! reelnotes-api - HTTP API for turning reels into notes.
//!
//! The binary in `main.rs` only bootstraps logging and configuration;
//! routing, state and handlers live here so tests can drive the router
//! directly.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use reelnotes_core::{defaults, ContentExtractor, NoteRepository};
use reelnotes_inference::NoteFormatter;

pub use error::ApiError;

/// Origins allowed when `ALLOWED_ORIGINS` is unset or blank.
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:8081";

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Shared handler state. Collaborators sit behind traits so tests can swap
/// in stubs.
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<dyn NoteRepository>,
    pub extractor: Arc<dyn ContentExtractor>,
    pub formatter: NoteFormatter,
}

impl AppState {
    pub fn new(
        notes: Arc<dyn NoteRepository>,
        extractor: Arc<dyn ContentExtractor>,
        formatter: NoteFormatter,
    ) -> Self {
        Self {
            notes,
            extractor,
            formatter,
        }
    }
}

// =============================================================================
// CORS
// =============================================================================

/// Parse a comma-separated origin list, skipping blanks and invalid values.
///
/// A blank list yields the local development defaults.
pub fn parse_allowed_origins(origins: &str) -> Vec<HeaderValue> {
    let origins = if origins.trim().is_empty() {
        DEFAULT_ALLOWED_ORIGINS
    } else {
        origins
    };

    origins
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!(origin = trimmed, error = %e, "Invalid CORS origin");
                    None
                }
            }
        })
        .collect()
}

fn cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(defaults::CORS_MAX_AGE_SECS))
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router with the default CORS origins.
pub fn app(state: AppState) -> Router {
    app_with_origins(state, parse_allowed_origins(""))
}

/// Build the application router.
pub fn app_with_origins(state: AppState, allowed_origins: Vec<HeaderValue>) -> Router {
    use handlers::{notes, reels};

    Router::new()
        .route("/health", get(health_check))
        // Notes
        .route("/api/v1/notes", get(notes::list_notes).post(notes::create_note))
        .route("/api/v1/notes/format", post(reels::format_transcript))
        .route(
            "/api/v1/notes/:id",
            get(notes::get_note)
                .patch(notes::update_note)
                .delete(notes::delete_note),
        )
        // Reels
        .route("/api/v1/reels/extract", post(reels::extract_reel))
        .route("/api/v1/reels/notes", post(reels::create_reel_note))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(allowed_origins))
        .layer(RequestBodyLimitLayer::new(defaults::MAX_BODY_SIZE_BYTES))
        .with_state(state)
}

// =============================================================================
// HEALTH CHECK
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
