//! Configuration module
//!
//! Runtime configuration for the conversion service, read from the process
//! environment (optionally seeded from a `.env` file).

use std::env;
use std::path::PathBuf;

const SERVER_PORT: u16 = 8080;
const SERVER_HOST: &str = "0.0.0.0";
const MP3_BITRATE_KBPS: u32 = 192;
const EXTRACTION_TIMEOUT_SECS: u64 = 300;
const MAX_UPLOAD_SIZE_MB: usize = 500;
const HTTP_CONCURRENCY_LIMIT: usize = 64;

/// Service configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    /// Parent directory of every request workspace.
    pub scratch_dir: PathBuf,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub mp3_bitrate_kbps: u32,
    pub extraction_timeout_secs: u64,
    pub max_upload_size_bytes: usize,
    pub http_concurrency_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: SERVER_HOST.to_string(),
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            scratch_dir: env::temp_dir(),
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            mp3_bitrate_kbps: MP3_BITRATE_KBPS,
            extraction_timeout_secs: EXTRACTION_TIMEOUT_SECS,
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` delegates here
    /// with `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let server_port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number, got '{}'", port))?,
            None => SERVER_PORT,
        };

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or(defaults.environment);

        let scratch_dir = lookup("SCRATCH_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.scratch_dir);

        let max_upload_size_mb = lookup("MAX_UPLOAD_SIZE_MB")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        Ok(Self {
            server_host: lookup("HOST").unwrap_or(defaults.server_host),
            server_port,
            environment,
            scratch_dir,
            ffmpeg_path: lookup("FFMPEG_PATH").unwrap_or(defaults.ffmpeg_path),
            ffprobe_path: lookup("FFPROBE_PATH").unwrap_or(defaults.ffprobe_path),
            mp3_bitrate_kbps: lookup("MP3_BITRATE_KBPS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(MP3_BITRATE_KBPS),
            extraction_timeout_secs: lookup("EXTRACTION_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(EXTRACTION_TIMEOUT_SECS),
            max_upload_size_bytes: max_upload_size_mb.saturating_mul(1024 * 1024),
            http_concurrency_limit: lookup("HTTP_CONCURRENCY_LIMIT")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT),
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("PORT cannot be 0"));
        }

        if !(32..=320).contains(&self.mp3_bitrate_kbps) {
            return Err(anyhow::anyhow!(
                "MP3_BITRATE_KBPS must be between 32 and 320, got {}",
                self.mp3_bitrate_kbps
            ));
        }

        if self.extraction_timeout_secs == 0 {
            return Err(anyhow::anyhow!("EXTRACTION_TIMEOUT_SECS cannot be 0"));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB cannot be 0"));
        }

        if self.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT cannot be 0"));
        }

        for (name, path) in [
            ("FFMPEG_PATH", &self.ffmpeg_path),
            ("FFPROBE_PATH", &self.ffprobe_path),
        ] {
            validate_binary_path(path)
                .map_err(|reason| anyhow::anyhow!("{} is invalid: {}", name, reason))?;
        }

        Ok(())
    }
}

/// Reject binary paths holding shell metacharacters or traversal sequences.
fn validate_binary_path(path: &str) -> Result<(), String> {
    if path.trim().is_empty() {
        return Err("path is empty".to_string());
    }

    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(format!("'{}' contains shell metacharacters", path));
    }

    if path.contains("..") {
        return Err(format!("'{}' contains directory traversal", path));
    }

    Ok(())
}
