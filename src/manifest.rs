//! Asset manifest generation.
//!
//! After every file-producing transform has settled, the output tree is
//! re-scanned and a single JSON index is written:
//!
//! ```json
//! {
//!   "version": "1700000000",
//!   "timestamp": 1700000123,
//!   "assets": { "css/style.a1b2c3d4.css": { "size": 24, "mtime": ..., "hash": "a1b2c3d4" } },
//!   "hashes": { "css/style.css": "a1b2c3d4" }
//! }
//! ```
//!
//! `assets` covers every style/script/image/font file found on disk;
//! `hashes` is the identity table (un-hashed path → digest), which is how
//! downstream tooling maps a source reference to its hashed filename.
//! The per-asset hash prefers the identity table entry and is otherwise
//! computed from the final file bytes, so every entry always has one.
//! The manifest is overwritten unconditionally on every run.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use anyhow::{Context, Result};
use jwalk::WalkDir;
use serde_json::{Map, Value, json};

use crate::config::PipelineConfig;
use crate::core::BuildContext;
use crate::utils::{hash, path::rel_key};

/// Manifest file name under the output root.
pub const MANIFEST_NAME: &str = "asset-manifest.json";

/// Extensions the manifest indexes (styles, scripts, images, fonts).
const MANIFEST_EXTS: [&str; 14] = [
    "css", "js", "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "woff", "woff2", "ttf", "otf",
    "eot",
];

/// Scan the output tree and write the manifest.
pub fn write_manifest(config: &PipelineConfig, ctx: &BuildContext) -> Result<()> {
    let output = &config.build.output;
    let mut assets = Map::new();

    for path in scan_assets(output) {
        let rel = rel_key(&path, output);
        let entry = asset_entry(&path, &rel, ctx)
            .with_context(|| format!("failed to index {}", path.display()))?;
        assets.insert(rel, entry);
    }

    let mut hashes = Map::new();
    for (rel, digest) in ctx.sorted_versions() {
        hashes.insert(rel, Value::String(digest));
    }

    let manifest = json!({
        "version": config.cache.version,
        "timestamp": unix_now(),
        "assets": assets,
        "hashes": hashes,
    });

    let path = output.join(MANIFEST_NAME);
    fs::write(&path, serde_json::to_vec_pretty(&manifest)?)
        .with_context(|| format!("failed to write {}", path.display()))
}

/// All manifest-indexed files under the output root, sorted for
/// deterministic manifests.
fn scan_assets(output: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(output)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| MANIFEST_EXTS.contains(&ext))
        })
        .collect();
    files.sort();
    files
}

fn asset_entry(path: &Path, rel: &str, ctx: &BuildContext) -> Result<Value> {
    let meta = fs::metadata(path)?;
    let mtime = meta
        .modified()?
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    // Identity table hit, else digest the final bytes
    let digest = match ctx.version_for(rel) {
        Some(digest) => digest,
        None => hash::fingerprint_file(path)?,
    };

    Ok(json!({
        "size": meta.len(),
        "mtime": mtime,
        "hash": digest,
    }))
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.build.output = dir.path().to_path_buf();
        config.cache.version = "1700000000".into();
        config
    }

    fn read_manifest(config: &PipelineConfig) -> Value {
        let raw = fs::read(config.build.output.join(MANIFEST_NAME)).unwrap();
        serde_json::from_slice(&raw).unwrap()
    }

    #[test]
    fn test_asset_set_matches_output_tree() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let ctx = BuildContext::new();

        fs::create_dir_all(dir.path().join("css")).unwrap();
        fs::write(dir.path().join("css/style.css"), "body{}").unwrap();
        fs::write(dir.path().join("logo.png"), "fake png").unwrap();
        fs::write(dir.path().join("font.woff2"), "fake font").unwrap();
        // Not in the extension set: must not appear
        fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        fs::write(dir.path().join("notes.txt"), "notes").unwrap();

        write_manifest(&config, &ctx).unwrap();

        let manifest = read_manifest(&config);
        let assets = manifest["assets"].as_object().unwrap();
        let keys: Vec<_> = assets.keys().collect();
        assert_eq!(keys, ["css/style.css", "font.woff2", "logo.png"]);
    }

    #[test]
    fn test_entry_fields() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let ctx = BuildContext::new();

        fs::write(dir.path().join("app.js"), "let a=1;").unwrap();
        write_manifest(&config, &ctx).unwrap();

        let manifest = read_manifest(&config);
        assert_eq!(manifest["version"], "1700000000");
        assert!(manifest["timestamp"].as_u64().unwrap() > 0);

        let entry = &manifest["assets"]["app.js"];
        assert_eq!(entry["size"].as_u64().unwrap(), 8);
        assert!(entry["mtime"].as_u64().unwrap() > 0);
        assert_eq!(
            entry["hash"].as_str().unwrap(),
            hash::fingerprint("let a=1;")
        );
    }

    #[test]
    fn test_identity_table_hash_preferred() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let ctx = BuildContext::new();

        fs::write(dir.path().join("app.js"), "let a=1;").unwrap();
        ctx.record_version("app.js", "feedface".into());

        write_manifest(&config, &ctx).unwrap();

        let manifest = read_manifest(&config);
        assert_eq!(manifest["assets"]["app.js"]["hash"], "feedface");
        assert_eq!(manifest["hashes"]["app.js"], "feedface");
    }

    #[test]
    fn test_manifest_overwritten() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let ctx = BuildContext::new();

        fs::write(
            config.build.output.join(MANIFEST_NAME),
            "{\"version\": \"stale\"}",
        )
        .unwrap();
        write_manifest(&config, &ctx).unwrap();

        let manifest = read_manifest(&config);
        assert_eq!(manifest["version"], "1700000000");
    }
}
