//! HTTP API server.
//!
//! Exposes the classification pipeline as a small JSON API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Service banner |
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/db-check` | Round-trip to the database |
//! | `GET`  | `/classify/{uuid}` | Classify the identifier in the path |
//! | `POST` | `/classify` | Classify `{"uuid": "..."}` |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "Invalid UUID format: 'xyz'. ..." } }
//! ```
//!
//! Error codes: `bad_request` (400), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use uuidy_core::models::ClassificationRecord;
use uuidy_core::resolve::Resolver;
use uuidy_core::search::SearchProvider;
use uuidy_core::store::Store;

use crate::config::Config;
use crate::db;
use crate::migrate;
use crate::search::create_provider;
use crate::sqlite_store::SqliteStore;

/// Resolver over type-erased storage and search, as used by the server.
pub type AppResolver = Resolver<Arc<dyn Store>, Arc<dyn SearchProvider>>;

#[derive(Clone)]
pub struct AppState {
    resolver: Arc<AppResolver>,
    cache_ttl_days: u32,
}

impl AppState {
    pub fn new(resolver: AppResolver, cache_ttl_days: u32) -> Self {
        Self {
            resolver: Arc::new(resolver),
            cache_ttl_days,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/db-check", get(handle_db_check))
        .route("/classify", post(handle_classify_body))
        .route("/classify/{uuid}", get(handle_classify_path))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let pool = db::connect(config).await?;
    migrate::apply(&pool).await?;

    let store: Arc<dyn Store> = Arc::new(SqliteStore::new(pool));
    let search = create_provider(&config.search)?;
    tracing::info!(provider = search.name(), "search provider ready");

    let state = AppState::new(Resolver::new(store, search), config.cache.ttl_days);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(bind = %config.server.bind, "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

impl From<uuidy_core::Error> for AppError {
    fn from(err: uuidy_core::Error) -> Self {
        match err {
            uuidy_core::Error::InvalidFormat(e) => bad_request(e.to_string()),
            other => {
                tracing::error!(error = %other, "classification failed");
                internal("Internal server error during classification")
            }
        }
    }
}

// ============ GET / ============

#[derive(Serialize)]
struct RootResponse {
    message: String,
    version: String,
    docs: String,
    cache_ttl_days: u32,
}

async fn handle_root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "UUID Classifier API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs: "GET /classify/{uuid} or POST /classify {\"uuid\": \"...\"}".to_string(),
        cache_ttl_days: state.cache_ttl_days,
    })
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /db-check ============

#[derive(Serialize)]
struct DbCheckResponse {
    status: String,
    database: String,
}

async fn handle_db_check(State(state): State<AppState>) -> Result<Json<DbCheckResponse>, AppError> {
    state.resolver.cache().ping().await.map_err(|e| {
        tracing::error!(error = %e, "database check failed");
        internal(format!("Database connection failed: {}", e))
    })?;

    Ok(Json(DbCheckResponse {
        status: "ok".to_string(),
        database: "connected".to_string(),
    }))
}

// ============ /classify ============

#[derive(Deserialize)]
struct ClassifyRequest {
    uuid: String,
}

async fn handle_classify_path(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<ClassificationRecord>, AppError> {
    tracing::info!(uuid = %uuid, "GET /classify");
    Ok(Json(state.resolver.resolve(&uuid).await?))
}

async fn handle_classify_body(
    State(state): State<AppState>,
    Json(req): Json<ClassifyRequest>,
) -> Result<Json<ClassificationRecord>, AppError> {
    tracing::info!(uuid = %req.uuid, "POST /classify");
    Ok(Json(state.resolver.resolve(&req.uuid).await?))
}
