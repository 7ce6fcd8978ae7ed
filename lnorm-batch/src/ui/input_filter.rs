//! Audio input filtering
//!
//! Only a fixed set of audio extensions is accepted, whether files arrive as
//! picked files or dropped paths. Matching is case-insensitive.

use std::path::{Path, PathBuf};
use tracing::warn;

/// Accepted input extensions (lowercase, without dot)
pub const AUDIO_EXTENSIONS: &[&str] = &["m4a", "aac", "wav", "mp3", "ogg"];

pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Keep audio files in their original order, warning about the rest
pub fn accept_audio_files<I>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    paths
        .into_iter()
        .filter(|path| {
            let accepted = is_audio_file(path);
            if !accepted {
                warn!("Skipping non-audio file: {}", path.display());
            }
            accepted
        })
        .collect()
}
