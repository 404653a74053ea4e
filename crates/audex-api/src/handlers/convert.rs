//! `POST /convert`: upload a video, receive its audio track as MP3.
//!
//! One request owns one workspace from the moment the upload is validated
//! until the response body is finished. On every early return the workspace
//! guard drops and the directory is removed; on success ownership moves into
//! the body stream.

use crate::constants::{INPUT_SUBDIR, OUTPUT_SUBDIR};
use crate::error::HttpAppError;
use crate::state::AppState;
use crate::upload::{self, UploadError};
use crate::utils::download::{attachment_disposition, WorkspaceFileStream};
use audex_core::AppError;
use audex_processing::{derive_audio_filename, AUDIO_MIME_TYPE};
use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, StatusCode},
    response::Response,
};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Where a conversion is in its lifecycle. Used as a log field only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStage {
    Received,
    Validated,
    Saved,
    Extracted,
    Responding,
}

impl ConversionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionStage::Received => "received",
            ConversionStage::Validated => "validated",
            ConversionStage::Saved => "saved",
            ConversionStage::Extracted => "extracted",
            ConversionStage::Responding => "responding",
        }
    }
}

impl fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[tracing::instrument(
    skip(state, multipart),
    fields(
        operation = "convert_video",
        filename = tracing::field::Empty,
        workspace = tracing::field::Empty
    )
)]
pub async fn convert_video(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HttpAppError> {
    let started = Instant::now();
    tracing::debug!(stage = %ConversionStage::Received, "Conversion request received");

    // Anything that is not a readable multipart body has no file part.
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(rejection = %rejection, "Request is not multipart/form-data");
        UploadError::MissingField
    })?;

    let upload = upload::receive(multipart).await?;
    let span = tracing::Span::current();
    span.record("filename", upload.filename.as_str());
    tracing::info!(
        stage = %ConversionStage::Validated,
        original_filename = %upload.original_filename,
        content_type = ?upload.content_type,
        size_bytes = upload.data.len(),
        "Upload validated"
    );

    let workspace = state.workspaces.acquire()?;
    span.record("workspace", tracing::field::display(workspace.path().display()));

    let source = workspace.subdir(INPUT_SUBDIR).await?.join(&upload.filename);
    tokio::fs::write(&source, &upload.data)
        .await
        .map_err(|e| AppError::Save(e.to_string()))?;
    tracing::info!(
        stage = %ConversionStage::Saved,
        path = %source.display(),
        size_bytes = upload.data.len(),
        "Upload staged"
    );
    // The staged copy is all that is needed from here on.
    drop(upload.data);

    let audio_filename = derive_audio_filename(&upload.filename);
    let output_dir = workspace.subdir(OUTPUT_SUBDIR).await?;
    let dest = output_dir.join(&audio_filename);

    let extract_started = Instant::now();
    state.extractor.extract(&source, &dest).await?;
    let extract_ms = extract_started.elapsed().as_millis() as u64;

    if let Some(probe) = &state.probe {
        match probe.probe(&dest).await {
            Ok(metadata) => tracing::info!(
                duration_secs = ?metadata.duration,
                bitrate = ?metadata.bitrate,
                sample_rate = ?metadata.sample_rate,
                channels = ?metadata.channels,
                codec = ?metadata.codec,
                "Extracted audio probed"
            ),
            Err(e) => tracing::warn!(error = %e, "Failed to probe extracted audio"),
        }
    }

    let file = tokio::fs::File::open(&dest)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to open extracted audio: {}", e)))?;
    let size_bytes = file
        .metadata()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to stat extracted audio: {}", e)))?
        .len();
    tracing::info!(
        stage = %ConversionStage::Extracted,
        audio_filename = %audio_filename,
        size_bytes,
        extract_ms,
        "Audio extracted"
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, AUDIO_MIME_TYPE)
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&audio_filename),
        )
        .header(header::CONTENT_LENGTH, size_bytes)
        .body(Body::from_stream(WorkspaceFileStream::new(file, workspace)))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    tracing::info!(
        stage = %ConversionStage::Responding,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Streaming extracted audio"
    );

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        let stages = [
            ConversionStage::Received,
            ConversionStage::Validated,
            ConversionStage::Saved,
            ConversionStage::Extracted,
            ConversionStage::Responding,
        ];
        let names: Vec<String> = stages.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            ["received", "validated", "saved", "extracted", "responding"]
        );
    }
}
