//! Audio extraction module

pub mod extractor;
pub mod probe;

pub use extractor::{AudioExtractor, ExtractionError, FfmpegAudioExtractor};
pub use probe::{AudioMetadata, AudioProbe, ProbeError};
