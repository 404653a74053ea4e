//! Audex API Library
//!
//! HTTP surface of the video-to-MP3 conversion service: upload parsing, the
//! conversion handler, error rendering and application setup.

pub mod constants;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod upload;
mod utils;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
pub use upload::{UploadError, UploadedFile};
