//! Audex Media Processing Library
//!
//! Request-scoped scratch workspaces, upload filename rules, and the ffmpeg /
//! ffprobe adapters that pull an MP3 track out of a video container.

pub mod audio;
pub mod naming;
pub mod workspace;

// Re-export commonly used types
pub use audio::{
    AudioExtractor, AudioMetadata, AudioProbe, ExtractionError, FfmpegAudioExtractor, ProbeError,
};
pub use naming::{
    derive_audio_filename, file_stem, sanitize_filename, AUDIO_EXTENSION, AUDIO_MIME_TYPE,
};
pub use workspace::{Workspace, WorkspaceError, WorkspaceManager};
