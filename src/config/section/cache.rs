//! `[cache]` section configuration.
//!
//! Cache-busting switch and the build version token used when a reference
//! has no recorded content hash.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Embed content hashes into style/script output filenames.
    pub enable: bool,

    /// Build version token. Defaults to the unix timestamp at config load;
    /// also the `?v=` fallback for references without a recorded hash.
    pub version: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable: true,
            version: String::new(),
        }
    }
}

impl CacheConfig {
    /// Fill in the version token if the config left it empty.
    pub fn resolve_version(&mut self) {
        if self.version.is_empty() {
            let secs = std::time::SystemTime::now()
                .duration_since(std::time::SystemTime::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            self.version = secs.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_version_fills_empty() {
        let mut config = CacheConfig::default();
        config.resolve_version();
        assert!(!config.version.is_empty());
        assert!(config.version.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_resolve_version_keeps_explicit() {
        let mut config = CacheConfig {
            enable: true,
            version: "1700000000".into(),
        };
        config.resolve_version();
        assert_eq!(config.version, "1700000000");
    }
}
