//! Hashed output filenames for cache busting.
//!
//! When cache busting is enabled, style/script assets are written under a
//! name that embeds the content digest of their post-transform bytes:
//! `style.css` → `style.a1b2c3d4.css`. The un-hashed name is never written,
//! so stale clients can only ever fetch current content.
//!
//! Two distinct assets may collide on the truncated 8-hex digest; they still
//! land on distinct filenames unless their stems also match. Collisions are
//! not detected.

/// Embed a digest into a file name, immediately before the extension.
///
/// A name without an extension gets the digest appended as a suffix.
pub fn hashed_file_name(name: &str, hash: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}.{hash}.{ext}"),
        _ => format!("{name}.{hash}"),
    }
}

/// Apply [`hashed_file_name`] to the final segment of a relative path.
pub fn hashed_rel_path(rel: &str, hash: &str) -> String {
    match rel.rsplit_once('/') {
        Some((dir, name)) => format!("{dir}/{}", hashed_file_name(name, hash)),
        None => hashed_file_name(rel, hash),
    }
}
