//! `[pwa]` section configuration.
//!
//! Descriptor fields for the web-app manifest, the worker script and the
//! offline fallback page. Everything here is substituted into static
//! templates; no runtime behavior lives in this crate.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PwaConfig {
    /// Emit manifest.json, sw.js and offline.html.
    pub enable: bool,

    /// Application name (required when enabled).
    pub name: String,

    /// Short name shown under the installed icon. Falls back to `name`.
    pub short_name: String,

    /// One-line description.
    pub description: String,

    /// CSS color for the browser chrome.
    pub theme_color: String,

    /// CSS color behind the splash screen.
    pub background_color: String,

    /// Display mode (`standalone`, `fullscreen`, `minimal-ui`, `browser`).
    pub display: String,

    /// Screen orientation lock.
    pub orientation: String,

    /// URL opened when the app launches.
    pub start_url: String,

    /// Navigation scope.
    pub scope: String,

    /// Primary language tag.
    pub lang: String,

    /// Text direction (`ltr`, `rtl`, `auto`).
    pub dir: String,

    /// App store categories.
    pub categories: Vec<String>,
}

impl Default for PwaConfig {
    fn default() -> Self {
        Self {
            enable: false,
            name: String::new(),
            short_name: String::new(),
            description: String::new(),
            theme_color: "#ffffff".into(),
            background_color: "#ffffff".into(),
            display: "standalone".into(),
            orientation: "portrait".into(),
            start_url: "/".into(),
            scope: "/".into(),
            lang: "en".into(),
            dir: "ltr".into(),
            categories: Vec::new(),
        }
    }
}

impl PwaConfig {
    /// Short name, falling back to the full name.
    pub fn short_name(&self) -> &str {
        if self.short_name.is_empty() {
            &self.name
        } else {
            &self.short_name
        }
    }
}
