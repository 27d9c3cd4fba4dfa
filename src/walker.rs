//! Source tree walker (pure, no side effects beyond reads).
//!
//! Enumerates files under a root directory whose extension matches exactly
//! (case-sensitive), in pre-order depth-first order. Directory entries are
//! visited in name order so repeated runs see identical sequences.
//!
//! An unreadable directory is a hard error: the run cannot claim a complete
//! pass over the tree, so the failure propagates to the orchestrator.
//! Symbolic-link cycles are not detected.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Collect all files under `root` with the given extension.
pub fn walk(root: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk_into(root, ext, &mut files)?;
    Ok(files)
}

/// Collect files matching any of the given extensions, one traversal per
/// extension, concatenated in extension order.
pub fn walk_all(root: &Path, exts: &[&str]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for ext in exts {
        files.extend(walk(root, ext)?);
    }
    Ok(files)
}

fn walk_into(dir: &Path, ext: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("failed to read directory {}", dir.display()))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            walk_into(&path, ext, out)?;
        } else if path.extension() == Some(OsStr::new(ext)) {
            out.push(path);
        }
    }
    Ok(())
}
