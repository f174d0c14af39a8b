// src/watch/patterns.rs

//! Marker file recognition.
//!
//! The game client writes its screenshots as `.tga` files. Any casing of the
//! extension counts (`SHOT.TGA`, `shot.Tga`).

use std::path::Path;

/// Extension (with the dot) that identifies a marker file, lowercase.
pub const MARKER_EXTENSION: &str = ".tga";

/// Returns true if `name` is a marker file name.
pub fn is_marker_name(name: &str) -> bool {
    name.to_lowercase().ends_with(MARKER_EXTENSION)
}

/// Returns true if the final component of `path` is a marker file name.
///
/// Paths without a file name (e.g. `/` or `..`) never match.
pub fn is_marker_path(path: &Path) -> bool {
    path.file_name()
        .map(|n| is_marker_name(&n.to_string_lossy()))
        .unwrap_or(false)
}
