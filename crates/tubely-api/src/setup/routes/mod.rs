//! Route configuration and setup.
//!
//! Health checks live in [health](health).

mod health;

use crate::constants::VIDEO_UPLOAD_ROUTE;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tubely_core::Config;

/// HTTP-layer limits, split out of [`Config`] so routers can be built without
/// a full environment.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub cors_origins: Vec<String>,
    pub max_upload_size_bytes: usize,
    pub request_timeout: Duration,
    pub concurrency_limit: usize,
}

impl HttpSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cors_origins: config.cors_origins().to_vec(),
            max_upload_size_bytes: config.max_upload_size_bytes(),
            request_timeout: Duration::from_secs(config.request_timeout_secs()),
            concurrency_limit: config.http_concurrency_limit(),
        }
    }
}

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let settings = HttpSettings::from_config(config);
    tracing::info!(
        http_concurrency_limit = settings.concurrency_limit,
        request_timeout_secs = settings.request_timeout.as_secs(),
        max_upload_size_bytes = settings.max_upload_size_bytes,
        "HTTP layers configured"
    );
    build_router(state, &settings)
}

pub fn build_router(
    state: Arc<AppState>,
    settings: &HttpSettings,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(&settings.cors_origins)?;

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .route(VIDEO_UPLOAD_ROUTE, post(handlers::video_upload::upload_video))
        .layer(ConcurrencyLimitLayer::new(settings.concurrency_limit.max(1)))
        // The request body limit replaces axum's 2 MiB default.
        .layer(RequestBodyLimitLayer::new(settings.max_upload_size_bytes))
        .layer(DefaultBodyLimit::disable())
        .layer(TimeoutLayer::new(settings.request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(cors_origins: &[String]) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let cors = if cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
