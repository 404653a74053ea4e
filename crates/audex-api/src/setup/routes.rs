//! Route configuration and setup

use crate::constants::{CONVERT_PATH, HEALTH_PATH};
use crate::error::panic_response;
use crate::handlers;
use crate::state::AppState;
use audex_infra::{request_id_middleware, security_headers_middleware, SecurityHeadersConfig};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Build the application router with its middleware stack.
pub fn build_router(state: Arc<AppState>) -> Router {
    let config = &state.config;

    let security_headers_config = Arc::new(SecurityHeadersConfig::new(config.is_production()));

    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit,
        max_upload_size_bytes = config.max_upload_size_bytes,
        "HTTP limits enabled"
    );

    Router::new()
        .route("/", get(handlers::index::index))
        .route(HEALTH_PATH, get(handlers::health::liveness))
        .route(CONVERT_PATH, post(handlers::convert::convert_video))
        // Enforced while the multipart body is read, so oversized uploads
        // surface as a JSON 413 from the handler.
        .layer(DefaultBodyLimit::max(config.max_upload_size_bytes))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ))
        .with_state(state)
}
