//! Stand-in extractors so handler tests don't need ffmpeg.

use async_trait::async_trait;
use audex_processing::{AudioExtractor, ExtractionError};
use std::path::Path;

/// Marker written before the copied input.
pub const FAKE_MP3_HEADER: &[u8] = b"ID3";

/// Writes `ID3` followed by the source bytes.
pub struct CopyExtractor;

#[async_trait]
impl AudioExtractor for CopyExtractor {
    async fn extract(&self, source: &Path, dest: &Path) -> Result<(), ExtractionError> {
        let input = tokio::fs::read(source)
            .await
            .map_err(|e| ExtractionError::new(e.to_string()))?;
        let mut output = FAKE_MP3_HEADER.to_vec();
        output.extend_from_slice(&input);
        tokio::fs::write(dest, output)
            .await
            .map_err(|e| ExtractionError::new(e.to_string()))
    }
}

/// Always fails with the given message.
pub struct FailingExtractor(pub &'static str);

#[async_trait]
impl AudioExtractor for FailingExtractor {
    async fn extract(&self, _source: &Path, _dest: &Path) -> Result<(), ExtractionError> {
        Err(ExtractionError::new(self.0))
    }
}

/// Panics mid-conversion, after the upload has been staged.
pub struct PanickingExtractor;

#[async_trait]
impl AudioExtractor for PanickingExtractor {
    async fn extract(&self, source: &Path, _dest: &Path) -> Result<(), ExtractionError> {
        assert!(source.exists());
        panic!("decoder crashed");
    }
}

/// Fails unless the workspace holds exactly one staged upload and nothing
/// besides the input and output dirs. Catches workspaces shared between
/// requests.
pub struct IsolationCheckingExtractor;

#[async_trait]
impl AudioExtractor for IsolationCheckingExtractor {
    async fn extract(&self, source: &Path, dest: &Path) -> Result<(), ExtractionError> {
        let input_dir = source
            .parent()
            .ok_or_else(|| ExtractionError::new("staged upload has no parent"))?;
        let workspace = input_dir
            .parent()
            .ok_or_else(|| ExtractionError::new("input dir has no parent"))?;
        for (dir, expected) in [(input_dir, 1), (workspace, 2)] {
            let entries = std::fs::read_dir(dir)
                .map_err(|e| ExtractionError::new(e.to_string()))?
                .count();
            if entries != expected {
                return Err(ExtractionError::new(format!(
                    "{} holds {} entries",
                    dir.display(),
                    entries
                )));
            }
        }
        tokio::task::yield_now().await;
        CopyExtractor.extract(source, dest).await
    }
}
