//! Service construction

use crate::state::AppState;
use anyhow::{Context, Result};
use audex_core::Config;
use audex_processing::{AudioProbe, FfmpegAudioExtractor};
use std::sync::Arc;
use std::time::Duration;

/// Prepare the scratch root and wire the ffmpeg-backed extractor into state.
pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    tokio::fs::create_dir_all(&config.scratch_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create scratch directory {}",
                config.scratch_dir.display()
            )
        })?;

    let extractor = Arc::new(FfmpegAudioExtractor::new(
        config.ffmpeg_path.clone(),
        config.mp3_bitrate_kbps,
        Duration::from_secs(config.extraction_timeout_secs),
    ));
    let probe = Arc::new(AudioProbe::new(config.ffprobe_path.clone()));

    tracing::info!(
        scratch_dir = %config.scratch_dir.display(),
        ffmpeg_path = %config.ffmpeg_path,
        ffprobe_path = %config.ffprobe_path,
        mp3_bitrate_kbps = config.mp3_bitrate_kbps,
        extraction_timeout_secs = config.extraction_timeout_secs,
        "Conversion services initialized"
    );

    Ok(Arc::new(AppState::new(
        config.clone(),
        extractor,
        Some(probe),
    )))
}
