//! CDN descriptor emission.
//!
//! Writes `cdn-config.json`, a small informational document consumed by the
//! deployment step to configure the CDN origin. Nothing in this pipeline
//! reads it back.

use std::fs;
use std::time::UNIX_EPOCH;

use anyhow::{Context, Result};
use serde_json::json;

use crate::config::PipelineConfig;

/// Descriptor file name under the output root.
pub const DESCRIPTOR_NAME: &str = "cdn-config.json";

/// Write the CDN descriptor to the output root.
pub fn write_descriptor(config: &PipelineConfig) -> Result<()> {
    let descriptor = json!({
        "enabled": config.cdn.enable,
        "baseUrl": config.cdn.base_url,
        "assets": config.cdn.extensions,
        "version": config.cache.version,
        "timestamp": std::time::SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0),
    });

    let path = config.build.output.join(DESCRIPTOR_NAME);
    fs::write(&path, serde_json::to_vec_pretty(&descriptor)?)
        .with_context(|| format!("failed to write {}", path.display()))
}
