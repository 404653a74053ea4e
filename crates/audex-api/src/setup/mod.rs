//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod services;
pub mod validation;

use crate::constants::SERVICE_NAME;
use crate::state::AppState;
use anyhow::{Context, Result};
use audex_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    audex_infra::init_telemetry(SERVICE_NAME, env!("CARGO_PKG_VERSION"), &config.environment)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    validation::check_ffmpeg(&config.ffmpeg_path).await;

    let state = services::initialize_services(&config).await?;
    let router = routes::build_router(state.clone());

    Ok((state, router))
}
