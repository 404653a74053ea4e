//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Every failure is folded into an
//! `AppError` and rendered as `{"error": "<message>"}` with the variant's status.

use crate::upload::UploadError;
use audex_core::{AppError, ErrorMetadata, LogLevel};
use audex_processing::{ExtractionError, WorkspaceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::any::Any;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: AppError lives in audex-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<UploadError> for HttpAppError {
    fn from(err: UploadError) -> Self {
        let app = match err {
            UploadError::MissingField => AppError::MissingField,
            UploadError::EmptySelection => AppError::EmptySelection,
            UploadError::TooLarge => AppError::PayloadTooLarge,
            UploadError::Malformed(detail) => {
                tracing::warn!(detail = %detail, "Malformed upload");
                AppError::InvalidUpload
            }
        };
        HttpAppError(app)
    }
}

impl From<WorkspaceError> for HttpAppError {
    fn from(err: WorkspaceError) -> Self {
        HttpAppError(AppError::Save(err.to_string()))
    }
}

impl From<ExtractionError> for HttpAppError {
    fn from(err: ExtractionError) -> Self {
        HttpAppError(AppError::Extraction(err.message().to_string()))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = Json(ErrorResponse {
            error: app_error.client_message(),
        });

        (status, body).into_response()
    }
}

/// Response for a handler that panicked. The panic never reaches the
/// transport; the request's workspace is released while unwinding.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    HttpAppError(AppError::Internal(format!("handler panicked: {}", detail))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render_response(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn render(err: HttpAppError) -> (StatusCode, serde_json::Value) {
        render_response(err.into_response()).await
    }

    #[tokio::test]
    async fn test_missing_field_renders_400() {
        let (status, body) = render(UploadError::MissingField.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "No file part in the request"}));
    }

    #[tokio::test]
    async fn test_empty_selection_renders_400() {
        let (status, body) = render(UploadError::EmptySelection.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "No file selected"}));
    }

    #[tokio::test]
    async fn test_malformed_upload_renders_invalid_file_object() {
        let (status, body) =
            render(UploadError::Malformed("unexpected end of stream".to_string()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"error": "Invalid file object."}));
    }

    #[tokio::test]
    async fn test_too_large_renders_413() {
        let (status, body) = render(UploadError::TooLarge.into()).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "File too large");
    }

    #[tokio::test]
    async fn test_extraction_error_renders_detail() {
        let err = ExtractionError::new("Stream map '0:a:0' matches no streams.");
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "Error during video conversion: Stream map '0:a:0' matches no streams."
        );
    }

    #[tokio::test]
    async fn test_workspace_error_renders_save_error() {
        let err = WorkspaceError::Create {
            root: "/nope".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("Could not save file: "));
        assert!(message.contains("denied"));
    }

    #[tokio::test]
    async fn test_panic_response_hides_detail() {
        let (status, body) = render_response(panic_response(Box::new("boom"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"error": "Internal server error"}));
    }
}
