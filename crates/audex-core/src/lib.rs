//! Audex Core Library
//!
//! Configuration and the handler-boundary error taxonomy shared by every
//! audex crate.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
