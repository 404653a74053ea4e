//! Upload receiver: pull the `video` file part out of a multipart request.
//!
//! Validation happens before anything touches the disk. A part only counts as
//! a file when it carries a `filename` parameter; a file part with an empty
//! filename is what browsers send when nothing was chosen.

use crate::constants::VIDEO_FIELD;
use audex_processing::sanitize_filename;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;

/// A validated upload held in memory until it is staged into a workspace.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as sent by the client. Never used to build paths.
    pub original_filename: String,
    /// Final path component of the client filename, safe to join onto a
    /// workspace path.
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file part in the request")]
    MissingField,

    #[error("No file selected")]
    EmptySelection,

    #[error("upload exceeds the configured size limit")]
    TooLarge,

    #[error("malformed multipart body: {0}")]
    Malformed(String),
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::TooLarge
        } else {
            UploadError::Malformed(err.body_text())
        }
    }
}

/// Find the first `video` file part and read it.
///
/// Other fields are skipped. The content type is recorded but not checked, and
/// any filename is accepted, with or without an extension.
pub async fn receive(mut multipart: Multipart) -> Result<UploadedFile, UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        // A `video` part without a filename parameter is a plain form value.
        let Some(original_filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        if original_filename.is_empty() {
            return Err(UploadError::EmptySelection);
        }

        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;
        let filename = sanitize_filename(&original_filename);

        tracing::debug!(
            original_filename = %original_filename,
            filename = %filename,
            content_type = ?content_type,
            size_bytes = data.len(),
            "Upload received"
        );

        return Ok(UploadedFile {
            original_filename,
            filename,
            content_type,
            data,
        });
    }

    Err(UploadError::MissingField)
}
