//! Audio probe - metadata of an extracted artifact via ffprobe

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Failed to run ffprobe: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("ffprobe failed: {0}")]
    Failed(String),

    #[error("Failed to parse ffprobe output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no audio stream found")]
    NoAudioStream,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioMetadata {
    pub duration: Option<f64>,
    pub bitrate: Option<i32>,
    pub sample_rate: Option<i32>,
    pub channels: Option<i32>,
    pub codec: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FFprobeOutput {
    format: Option<FFprobeFormat>,
    streams: Option<Vec<FFprobeStream>>,
}

#[derive(Debug, Deserialize)]
struct FFprobeFormat {
    duration: Option<String>,
    bit_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FFprobeStream {
    codec_type: Option<String>,
    sample_rate: Option<String>,
    channels: Option<i32>,
    codec_name: Option<String>,
}

pub struct AudioProbe {
    ffprobe_path: String,
}

impl AudioProbe {
    pub fn new(ffprobe_path: String) -> Self {
        Self { ffprobe_path }
    }

    /// Extract audio metadata from a file using ffprobe
    #[tracing::instrument(skip(self, file_path), fields(service = "audio"))]
    pub async fn probe(&self, file_path: &Path) -> Result<AudioMetadata, ProbeError> {
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-show_format", "-show_streams", "-of", "json"])
            .arg(file_path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(ProbeError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::Failed(stderr.trim().to_string()));
        }

        parse_ffprobe_output(&output.stdout)
    }
}

fn parse_ffprobe_output(stdout: &[u8]) -> Result<AudioMetadata, ProbeError> {
    let json_output: FFprobeOutput = serde_json::from_slice(stdout)?;

    let audio_stream = json_output
        .streams
        .and_then(|streams| {
            streams
                .into_iter()
                .find(|s| s.codec_type.as_deref() == Some("audio"))
        })
        .ok_or(ProbeError::NoAudioStream)?;

    let duration = json_output
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|d| d.parse::<f64>().ok());

    let bitrate = json_output
        .format
        .as_ref()
        .and_then(|f| f.bit_rate.as_ref())
        .and_then(|b| b.parse::<i32>().ok());

    let sample_rate = audio_stream
        .sample_rate
        .as_ref()
        .and_then(|sr| sr.parse::<i32>().ok());

    Ok(AudioMetadata {
        duration,
        bitrate,
        sample_rate,
        channels: audio_stream.channels,
        codec: audio_stream.codec_name,
    })
}
