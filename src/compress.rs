//! Pre-compressed sibling generation.
//!
//! For every finalized output file in the compressible set, writes a `.gz`
//! and/or `.br` sibling next to it, leaving the original untouched. Web
//! servers negotiate these via `Accept-Encoding` without compressing at
//! request time.
//!
//! Siblings are regenerated every run. A failure on one file is surfaced as
//! a warning and the batch continues.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::{Compression, write::GzEncoder};
use jwalk::WalkDir;
use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::core::{BuildContext, BuildStats};
use crate::log;
use crate::utils::path::rel_key;

/// Extensions that compress well enough to pre-compress.
const COMPRESSIBLE_EXTS: [&str; 7] = ["html", "htm", "css", "js", "json", "xml", "txt"];

/// Compress every eligible file under the output root.
pub fn run(config: &PipelineConfig, ctx: &BuildContext) -> Result<()> {
    let files = scan_compressible(&config.build.output);

    files.par_iter().for_each(|path| {
        if let Err(e) = compress_file(path, config) {
            log!("warning"; "compress {}: {:#}", rel_key(path, &config.build.output), e);
            BuildStats::inc(&ctx.stats.warnings);
        } else {
            BuildStats::inc(&ctx.stats.compressed);
        }
    });

    Ok(())
}

/// Compressible files under the output root, sorted for deterministic
/// warning order.
fn scan_compressible(output: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(output)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| COMPRESSIBLE_EXTS.contains(&ext))
        })
        .collect();
    files.sort();
    files
}

fn compress_file(path: &Path, config: &PipelineConfig) -> Result<()> {
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

    if config.compress.gzip {
        let sibling = sibling_path(path, "gz");
        fs::write(&sibling, gzip_bytes(&data, config.compress.gzip_level())?)
            .with_context(|| format!("failed to write {}", sibling.display()))?;
    }
    if config.compress.brotli {
        let sibling = sibling_path(path, "br");
        fs::write(&sibling, brotli_bytes(&data, config.compress.brotli_quality())?)
            .with_context(|| format!("failed to write {}", sibling.display()))?;
    }
    Ok(())
}

/// `dir/name.ext` → `dir/name.ext.gz`
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn gzip_bytes(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn brotli_bytes(data: &[u8], quality: u32) -> Result<Vec<u8>> {
    let mut encoder = brotli::CompressorWriter::new(Vec::new(), 4096, quality, 22);
    encoder.write_all(data)?;
    encoder.flush()?;
    Ok(encoder.into_inner())
}
