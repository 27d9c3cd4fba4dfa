//! `[cdn]` section configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CdnConfig {
    /// Rewrite eligible markup references to the CDN host.
    pub enable: bool,

    /// CDN base URL (e.g. `https://cdn.example.com`). Trailing slashes
    /// are stripped during normalization.
    pub base_url: String,

    /// Extensions eligible for CDN redirection.
    pub extensions: Vec<String>,
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            enable: false,
            base_url: String::new(),
            extensions: [
                "css", "js", "png", "jpg", "jpeg", "gif", "svg", "webp", "woff", "woff2",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

impl CdnConfig {
    pub fn normalize(&mut self) {
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        for ext in &mut self.extensions {
            *ext = ext.trim_start_matches('.').to_ascii_lowercase();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let mut config = CdnConfig {
            enable: true,
            base_url: "https://cdn.example.com///".into(),
            extensions: vec![".CSS".into(), "js".into()],
        };
        config.normalize();
        assert_eq!(config.base_url, "https://cdn.example.com");
        assert_eq!(config.extensions, vec!["css", "js"]);
    }
}
