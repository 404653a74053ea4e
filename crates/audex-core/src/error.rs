//! Error types module
//!
//! `AppError` is the taxonomy every conversion failure is folded into before it
//! reaches the HTTP layer. Client-caused failures (400/413) are separated from
//! server or environment failures (500); each variant self-describes its status,
//! code, client message and log level through `ErrorMetadata`.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "EXTRACTION_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No file part in the request")]
    MissingField,

    #[error("No file selected")]
    EmptySelection,

    #[error("File too large")]
    PayloadTooLarge,

    #[error("Could not save file: {0}")]
    Save(String),

    #[error("Error during video conversion: {0}")]
    Extraction(String),

    #[error("Invalid file object.")]
    InvalidUpload,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, LogLevel) {
    match err {
        AppError::MissingField => (400, "MISSING_FILE_PART", LogLevel::Debug),
        AppError::EmptySelection => (400, "NO_FILE_SELECTED", LogLevel::Debug),
        AppError::PayloadTooLarge => (413, "PAYLOAD_TOO_LARGE", LogLevel::Debug),
        AppError::Save(_) => (500, "SAVE_ERROR", LogLevel::Error),
        AppError::Extraction(_) => (500, "EXTRACTION_ERROR", LogLevel::Error),
        AppError::InvalidUpload => (500, "INVALID_UPLOAD", LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for log fields
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::MissingField | AppError::EmptySelection | AppError::PayloadTooLarge => {
                "Validation"
            }
            AppError::Save(_) => "Save",
            AppError::Extraction(_) => "Extraction",
            AppError::InvalidUpload | AppError::Internal(_) => "Unclassified",
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status_code())
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            // Internal details stay in the logs.
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}
