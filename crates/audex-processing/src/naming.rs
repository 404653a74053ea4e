//! Filename rules for uploads and extracted audio.

/// Extension of every extracted artifact.
pub const AUDIO_EXTENSION: &str = "mp3";

/// MIME type of every extracted artifact.
pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";

const FALLBACK_FILENAME: &str = "upload";

/// Strip the final `.extension` from a filename. Only the last dot counts; a
/// name without any dot is its own stem.
pub fn file_stem(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) => &filename[..idx],
        None => filename,
    }
}

/// Download name of the audio extracted from `filename`: its stem plus `.mp3`.
pub fn derive_audio_filename(filename: &str) -> String {
    format!("{}.{}", file_stem(filename), AUDIO_EXTENSION)
}

/// Reduce an attacker-controlled upload filename to something safe to join
/// onto a workspace path.
///
/// Only the final path component survives (both `/` and `\` separate), control
/// characters are dropped, and names that would resolve to a directory fall
/// back to `upload`.
pub fn sanitize_filename(filename: &str) -> String {
    let last_component = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let cleaned: String = last_component
        .chars()
        .filter(|c| !c.is_control())
        .collect();

    match cleaned.trim() {
        "" | "." | ".." => FALLBACK_FILENAME.to_string(),
        _ => cleaned,
    }
}
