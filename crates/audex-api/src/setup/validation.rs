//! Configuration validation
//!
//! Validates configuration at startup and reports on the external tools the
//! service shells out to.

use anyhow::Result;
use audex_core::Config;
use std::process::Stdio;
use tokio::process::Command;

/// Validate configuration values, failing fast on anything unusable.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production()
        && std::env::var("ENVIRONMENT")
            .or_else(|_| std::env::var("APP_ENV"))
            .is_err()
    {
        tracing::warn!("Production mode detected but ENVIRONMENT/APP_ENV not set");
    }

    if !config.scratch_dir.is_absolute() {
        tracing::warn!(
            scratch_dir = %config.scratch_dir.display(),
            "SCRATCH_DIR is relative; workspaces depend on the working directory"
        );
    }

    Ok(())
}

/// Run `ffmpeg -version` once and log the outcome.
///
/// Never fails: the server starts regardless and conversions report the
/// problem per request.
pub async fn check_ffmpeg(ffmpeg_path: &str) {
    let result = Command::new(ffmpeg_path)
        .arg("-version")
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await;

    match result {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let version = stdout.lines().next().unwrap_or("unknown version");
            tracing::info!(ffmpeg_path = %ffmpeg_path, version = %version, "ffmpeg available");
        }
        Ok(output) => {
            tracing::warn!(
                ffmpeg_path = %ffmpeg_path,
                status = %output.status,
                "ffmpeg -version failed; conversions will fail"
            );
        }
        Err(e) => {
            tracing::warn!(
                ffmpeg_path = %ffmpeg_path,
                error = %e,
                "ffmpeg not found; conversions will fail"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = Config {
            extraction_timeout_secs: 0,
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_missing_ffmpeg_only_warns() {
        check_ffmpeg("/definitely/not/ffmpeg").await;
    }
}
