//! `[inline]` section configuration.
//!
//! Small assets below the byte ceiling are embedded directly into markup
//! instead of being referenced externally.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InlineConfig {
    /// Inline small stylesheets as `<style>` blocks.
    pub styles: bool,

    /// Inline small scripts as `<script>` blocks.
    pub scripts: bool,

    /// Inline small images as base64 data URIs.
    pub images: bool,

    /// Size ceiling in bytes; assets at or below it are inlined.
    pub max_bytes: u64,
}

impl Default for InlineConfig {
    fn default() -> Self {
        Self {
            styles: false,
            scripts: false,
            images: false,
            max_bytes: 8192,
        }
    }
}

impl InlineConfig {
    /// Whether any inlining pass is active.
    pub fn any(&self) -> bool {
        self.styles || self.scripts || self.images
    }
}
