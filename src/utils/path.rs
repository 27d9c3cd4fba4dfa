//! Path normalization and relative-path helpers.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Relative path of `path` under `root`, with forward slashes.
///
/// Identity-table keys and manifest keys use this form so they are stable
/// across platforms. Paths outside `root` are returned unchanged.
pub fn rel_key(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<_> = rel
        .iter()
        .filter_map(|c| c.to_str())
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    parts.join("/")
}
