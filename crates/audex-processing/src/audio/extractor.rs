//! Audio extraction - demux a video container and transcode its audio to MP3.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Every way an extraction can fail, collapsed into one kind carrying the
/// underlying message (corrupt container, no audio stream, unsupported codec,
/// disk full, permission denied, timeout).
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ExtractionError {
    message: String,
}

impl ExtractionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Pulls the audio track of `source` into an MP3 at `dest`.
///
/// Implementations write exactly one file, `dest`, and must leave neither a
/// partial output nor a running decoder behind when they fail.
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    async fn extract(&self, source: &Path, dest: &Path) -> Result<(), ExtractionError>;
}

/// [`AudioExtractor`] backed by the ffmpeg binary.
#[derive(Debug, Clone)]
pub struct FfmpegAudioExtractor {
    ffmpeg_path: String,
    bitrate_kbps: u32,
    timeout: Duration,
}

impl FfmpegAudioExtractor {
    pub fn new(ffmpeg_path: String, bitrate_kbps: u32, timeout: Duration) -> Self {
        Self {
            ffmpeg_path,
            bitrate_kbps,
            timeout,
        }
    }

    fn build_args(&self, source: &Path, dest: &Path) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-y".to_string(),
            "-i".to_string(),
            source.to_string_lossy().to_string(),
            // First audio stream only; fails loudly when there is none.
            "-map".to_string(),
            "0:a:0".to_string(),
            "-acodec".to_string(),
            "libmp3lame".to_string(),
            "-b:a".to_string(),
            format!("{}k", self.bitrate_kbps),
            "-f".to_string(),
            "mp3".to_string(),
            dest.to_string_lossy().to_string(),
        ]
    }

    async fn run(&self, source: &Path, dest: &Path) -> Result<(), ExtractionError> {
        let args = self.build_args(source, dest);

        let child = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ExtractionError::new(format!(
                    "Failed to execute ffmpeg: {}",
                    e
                )))
            }
            Err(_) => {
                return Err(ExtractionError::new(format!(
                    "Audio extraction timed out after {} seconds",
                    self.timeout.as_secs_f64()
                )))
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = summarize_stderr(&stderr)
                .unwrap_or_else(|| format!("ffmpeg exited with {}", output.status));
            return Err(ExtractionError::new(message));
        }

        match tokio::fs::metadata(dest).await {
            Ok(meta) if meta.len() > 0 => Ok(()),
            Ok(_) => Err(ExtractionError::new("no audio was produced")),
            Err(e) => Err(ExtractionError::new(format!(
                "no audio was produced: {}",
                e
            ))),
        }
    }
}

#[async_trait]
impl AudioExtractor for FfmpegAudioExtractor {
    #[tracing::instrument(
        skip(self, source, dest),
        fields(
            process.executable.name = "ffmpeg",
            process.executable.path = %self.ffmpeg_path,
            ffmpeg.operation = "extract_audio"
        )
    )]
    async fn extract(&self, source: &Path, dest: &Path) -> Result<(), ExtractionError> {
        let start = Instant::now();
        let result = self.run(source, dest).await;

        match &result {
            Ok(()) => tracing::info!(
                source = %source.display(),
                dest = %dest.display(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Audio extraction succeeded"
            ),
            Err(e) => {
                tracing::warn!(
                    source = %source.display(),
                    error = %e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Audio extraction failed"
                );
                remove_partial_output(dest).await;
            }
        }

        result
    }
}

async fn remove_partial_output(dest: &Path) {
    match tokio::fs::remove_file(dest).await {
        Ok(()) => tracing::debug!(dest = %dest.display(), "Removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            dest = %dest.display(),
            error = %e,
            "Failed to remove partial output"
        ),
    }
}

/// Condense ffmpeg's stderr (run at `-loglevel error`) into a single line.
fn summarize_stderr(stderr: &str) -> Option<String> {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("; "))
    }
}
