//! Image recompression with per-extension dispatch.
//!
//! - `jpg`/`jpeg`: lossy re-encode at quality 85
//! - `png`: lossless re-encode at maximum compression
//! - `svg`: re-serialized without indentation via usvg
//! - anything else: copied verbatim
//!
//! A codec failure is never fatal for the run; the caller falls back to a
//! verbatim copy of the original bytes. Re-encoded output that is not
//! smaller than the original is discarded in favor of the original.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};

/// JPEG re-encode quality.
const JPEG_QUALITY: u8 = 85;

/// Outcome of an image optimization attempt.
pub enum Optimized {
    /// Smaller re-encoded bytes to write instead of the original.
    Encoded(Vec<u8>),
    /// Unsupported extension, or the re-encode was not smaller.
    KeepOriginal,
}

/// Recompress image bytes according to the file's extension.
pub fn optimize_image(path: &Path, original: &[u8]) -> Result<Optimized> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    let encoded = match ext {
        "jpg" | "jpeg" => encode_jpeg(path, original)?,
        "png" => encode_png(path, original)?,
        "svg" => optimize_svg(original)?,
        _ => return Ok(Optimized::KeepOriginal),
    };

    if encoded.len() < original.len() {
        Ok(Optimized::Encoded(encoded))
    } else {
        Ok(Optimized::KeepOriginal)
    }
}

fn encode_jpeg(path: &Path, data: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data)
        .with_context(|| format!("failed to decode {}", path.display()))?;
    let mut buf = Vec::new();
    img.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY))
        .with_context(|| format!("failed to encode {}", path.display()))?;
    Ok(buf)
}

fn encode_png(path: &Path, data: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data)
        .with_context(|| format!("failed to decode {}", path.display()))?;
    let mut buf = Vec::new();
    img.write_with_encoder(PngEncoder::new_with_quality(
        &mut buf,
        CompressionType::Best,
        FilterType::Adaptive,
    ))
    .with_context(|| format!("failed to encode {}", path.display()))?;
    Ok(buf)
}

/// Re-serialize an SVG without indentation.
fn optimize_svg(data: &[u8]) -> Result<Vec<u8>> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default())
        .map_err(|e| anyhow!("failed to parse SVG: {e}"))?;

    let write_options = usvg::WriteOptions {
        indent: usvg::Indent::None,
        ..Default::default()
    };

    Ok(tree.to_string(&write_options).into_bytes())
}
