//! Route paths and form field names

/// Multipart field carrying the uploaded video.
pub const VIDEO_FIELD: &str = "video";

pub const CONVERT_PATH: &str = "/convert";
pub const HEALTH_PATH: &str = "/health";

/// Workspace subdirectories for the staged upload and the extracted audio.
/// Kept apart so an upload named `x.mp3` (or `output`) can't clash with its
/// own result.
pub const INPUT_SUBDIR: &str = "input";
pub const OUTPUT_SUBDIR: &str = "output";

pub const SERVICE_NAME: &str = "audex-api";
