//! `[build]` section configuration.
//!
//! Source/output roots and per-asset-class transform switches.
//!
//! # Example
//!
//! ```toml
//! [build]
//! input = "src"
//! output = "dist"
//! base_path = "/admin"
//! minify_markup = true
//! minify_styles = true
//! minify_scripts = true
//! optimize_images = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Source tree root (relative to the config file).
    pub input: PathBuf,

    /// Output tree root (relative to the config file).
    /// Treated as disposable build output, fully regenerated each run.
    pub output: PathBuf,

    /// Public base path assets are served under (e.g. `/admin`).
    /// Stripped from markup references when resolving them on disk.
    pub base_path: String,

    /// Collapse whitespace in markup files.
    pub minify_markup: bool,

    /// Minify stylesheet files.
    pub minify_styles: bool,

    /// Minify script files (strips console/debugger calls).
    pub minify_scripts: bool,

    /// Recompress raster images and optimize SVGs.
    pub optimize_images: bool,

    /// Remove the output tree before building (set from CLI --clean).
    #[serde(skip)]
    pub clean: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("src"),
            output: PathBuf::from("dist"),
            base_path: String::new(),
            minify_markup: true,
            minify_styles: true,
            minify_scripts: true,
            optimize_images: true,
            clean: false,
        }
    }
}

impl BuildConfig {
    /// Normalize `base_path` to `/prefix` form (empty stays empty).
    pub fn normalize_base_path(&mut self) {
        let trimmed = self.base_path.trim_matches('/');
        self.base_path = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };
    }
}
