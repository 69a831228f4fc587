//! reelnotes-api server binary.
//!
//! Environment:
//!   DATABASE_URL     - SQLite URL (default: sqlite://reelnotes.db?mode=rwc)
//!   DATABASE_MAX_CONNECTIONS - pool size (default: 5)
//!   HOST / PORT      - bind address (default: 0.0.0.0:3000)
//!   ALLOWED_ORIGINS  - comma-separated CORS origins
//!   LOG_FORMAT       - "json" or "text" (default: "text")
//!   LOG_FILE         - daily-rolled log file instead of stdout
//!   LOG_ANSI         - force ANSI colors on or off
//!   RUST_LOG         - env filter (default: "reelnotes_api=debug,tower_http=debug")
//!
//! Completion (`GROQ_*`) and extraction (`RAPID_API_*`) settings are read
//! by their own crates.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use reelnotes_core::{defaults, GenerationBackend};
use reelnotes_db::{Database, PoolConfig};
use reelnotes_extract::ReelExtractor;
use reelnotes_inference::{NoteFormatter, OpenAIBackend};

use reelnotes_api::{app_with_origins, parse_allowed_origins, AppState};

const DEFAULT_LOG_FILTER: &str = "reelnotes_api=debug,tower_http=debug";

struct LogSettings {
    json: bool,
    file: Option<String>,
    ansi: Option<bool>,
}

impl LogSettings {
    fn from_env() -> Self {
        Self {
            json: std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")),
            file: std::env::var("LOG_FILE").ok().filter(|f| !f.trim().is_empty()),
            ansi: std::env::var("LOG_ANSI").ok().map(|v| v == "true" || v == "1"),
        }
    }
}

/// Install the global subscriber. The returned guard flushes the file
/// writer and must live until shutdown.
fn init_tracing(settings: &LogSettings) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let (writer, guard) = match settings.file.as_deref() {
        Some(path) => {
            let path = Path::new(path);
            let dir = path.parent().unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .and_then(|f| f.to_str())
                .unwrap_or("reelnotes-api.log");
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, name));
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    // Files get plain text unless colors are explicitly requested
    let ansi = settings.ansi.unwrap_or(writer.is_none());
    let layer = match (settings.json, writer) {
        (true, Some(w)) => fmt::layer().json().with_writer(w).boxed(),
        (true, None) => fmt::layer().json().boxed(),
        (false, Some(w)) => fmt::layer().with_writer(w).with_ansi(ansi).boxed(),
        (false, None) => fmt::layer().with_ansi(ansi).boxed(),
    };

    tracing_subscriber::registry().with(filter).with(layer).init();
    guard
}

fn pool_config() -> PoolConfig {
    let config = PoolConfig::default();
    match std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|n| n.parse::<u32>().ok())
    {
        Some(n) if n > 0 => config.max_connections(n),
        _ => config,
    }
}

fn bind_address() -> anyhow::Result<SocketAddr> {
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(defaults::SERVER_PORT);
    Ok(format!("{}:{}", host, port).parse()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let log_settings = LogSettings::from_env();
    let _log_guard = init_tracing(&log_settings);
    info!(
        json = log_settings.json,
        log_file = log_settings.file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| defaults::DATABASE_URL.to_string());
    let db = Database::connect_with_config(&database_url, pool_config()).await?;
    db.migrate().await?;
    reelnotes_db::log_pool_metrics(db.pool());
    info!(database_url = %database_url, "Database ready");

    let backend = OpenAIBackend::from_env()?;
    if backend.config().api_key.is_none() {
        warn!("GROQ_API_KEY is not set; notes will use the raw caption");
    }
    info!(model = %backend.model_name(), "Completion backend ready");

    let extractor = ReelExtractor::from_env()?;
    if extractor.config().rapid_api_key.is_none() {
        info!("RAPID_API_KEY is not set; captions come from oEmbed only");
    }

    let state = AppState::new(
        Arc::new(db.notes),
        Arc::new(extractor),
        NoteFormatter::new(Arc::new(backend)),
    );
    let origins = parse_allowed_origins(&std::env::var("ALLOWED_ORIGINS").unwrap_or_default());
    let app = app_with_origins(state, origins);

    let addr = bind_address()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "reelnotes-api listening");
    axum::serve(listener, app).await?;

    Ok(())
}
