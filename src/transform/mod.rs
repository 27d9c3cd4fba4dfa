//! Per-asset-class transform stages.
//!
//! Each stage walks a prepared file list and processes files independently
//! in parallel. A failing file is skipped (styles/scripts) or copied
//! verbatim (images) with a warning; only the orchestrator-level collect
//! phase can fail a run.
//!
//! Styles and scripts populate the identity table as a side effect, so the
//! orchestrator runs them strictly before the markup stage (whose reference
//! rewriter reads the table).

pub mod image;
pub mod markup;
pub mod script;
pub mod style;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::config::PipelineConfig;
use crate::core::{BuildContext, BuildStats};
use crate::log;
use crate::logger::ProgressLine;
use crate::rewrite;
use crate::utils::{hash, path::rel_key};
use crate::version;

/// Extensions dispatched to the image stage.
pub const IMAGE_EXTS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "svg", "webp", "ico"];

/// Font extensions mirrored verbatim into the output tree.
pub const FONT_EXTS: [&str; 5] = ["woff", "woff2", "ttf", "otf", "eot"];

// ============================================================================
// Styles / Scripts
// ============================================================================

/// Minify, fingerprint and write stylesheet files.
pub fn process_styles(
    files: &[PathBuf],
    config: &PipelineConfig,
    ctx: &BuildContext,
    progress: Option<&ProgressLine>,
) {
    files.par_iter().for_each(|path| {
        let result = process_text_asset(
            path,
            config,
            ctx,
            config.build.minify_styles,
            style::minify_css,
        );
        finish_file(result, &ctx.stats.styles, path, config, ctx);
        if let Some(p) = progress {
            p.inc("styles");
        }
    });
}

/// Minify, fingerprint and write script files.
pub fn process_scripts(
    files: &[PathBuf],
    config: &PipelineConfig,
    ctx: &BuildContext,
    progress: Option<&ProgressLine>,
) {
    files.par_iter().for_each(|path| {
        let result = process_text_asset(
            path,
            config,
            ctx,
            config.build.minify_scripts,
            script::minify_js,
        );
        finish_file(result, &ctx.stats.scripts, path, config, ctx);
        if let Some(p) = progress {
            p.inc("scripts");
        }
    });
}

/// Log a skipped file or count a processed one.
fn finish_file(
    result: Result<()>,
    counter: &std::sync::atomic::AtomicUsize,
    path: &Path,
    config: &PipelineConfig,
    ctx: &BuildContext,
) {
    match result {
        Ok(()) => BuildStats::inc(counter),
        Err(e) => {
            log!("warning"; "skipped {}: {:#}", rel_key(path, &config.build.input), e);
            BuildStats::inc(&ctx.stats.warnings);
        }
    }
}

/// Shared style/script path: transform, fingerprint, record, write.
///
/// The digest is computed over the post-transform bytes — exactly what
/// lands on disk — and recorded in the identity table under the un-hashed
/// output-relative path. With cache busting enabled the file is written
/// only under its hashed name.
fn process_text_asset(
    path: &Path,
    config: &PipelineConfig,
    ctx: &BuildContext,
    minify: bool,
    minifier: fn(&str) -> Result<String>,
) -> Result<()> {
    let rel = rel_key(path, &config.build.input);
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    // Skip already minified inputs (.min.js / .min.css)
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let content = if minify && !stem.ends_with(".min") {
        minifier(&source)?
    } else {
        source
    };

    let digest = hash::fingerprint(&content);
    ctx.record_version(&rel, digest.clone());

    let out_rel = if config.cache.enable {
        version::hashed_rel_path(&rel, &digest)
    } else {
        rel
    };
    write_output(&config.build.output.join(out_rel), content.as_bytes())
}

// ============================================================================
// Images
// ============================================================================

/// Recompress and write image files.
///
/// Unsupported extensions are copied verbatim. A codec failure downgrades
/// to a verbatim copy with a warning; it never aborts the batch.
pub fn process_images(
    files: &[PathBuf],
    config: &PipelineConfig,
    ctx: &BuildContext,
    progress: Option<&ProgressLine>,
) {
    files.par_iter().for_each(|path| {
        if let Err(e) = process_image(path, config, ctx) {
            log!("warning"; "skipped {}: {:#}", rel_key(path, &config.build.input), e);
            BuildStats::inc(&ctx.stats.warnings);
        }
        if let Some(p) = progress {
            p.inc("images");
        }
    });
}

fn process_image(path: &Path, config: &PipelineConfig, ctx: &BuildContext) -> Result<()> {
    let rel = rel_key(path, &config.build.input);
    let original = fs::read(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let out_path = config.build.output.join(&rel);

    if !config.build.optimize_images {
        write_output(&out_path, &original)?;
        BuildStats::inc(&ctx.stats.copied);
        return Ok(());
    }

    match image::optimize_image(path, &original) {
        Ok(image::Optimized::Encoded(bytes)) => {
            write_output(&out_path, &bytes)?;
            BuildStats::inc(&ctx.stats.images);
        }
        Ok(image::Optimized::KeepOriginal) => {
            crate::debug!("images"; "kept original: {}", rel);
            write_output(&out_path, &original)?;
            BuildStats::inc(&ctx.stats.copied);
        }
        Err(e) => {
            log!("warning"; "{}: {:#}, copying original", rel, e);
            write_output(&out_path, &original)?;
            BuildStats::inc(&ctx.stats.copied);
            BuildStats::inc(&ctx.stats.warnings);
        }
    }
    Ok(())
}

// ============================================================================
// Fonts
// ============================================================================

/// Mirror font files into the output tree.
///
/// No codec applies; fonts are already compressed containers. They are
/// copied so the manifest scan finds them alongside everything else.
pub fn process_fonts(
    files: &[PathBuf],
    config: &PipelineConfig,
    ctx: &BuildContext,
    progress: Option<&ProgressLine>,
) {
    files.par_iter().for_each(|path| {
        let rel = rel_key(path, &config.build.input);
        let result = fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))
            .and_then(|bytes| write_output(&config.build.output.join(&rel), &bytes));
        match result {
            Ok(()) => BuildStats::inc(&ctx.stats.copied),
            Err(e) => {
                log!("warning"; "skipped {}: {:#}", rel, e);
                BuildStats::inc(&ctx.stats.warnings);
            }
        }
        if let Some(p) = progress {
            p.inc("fonts");
        }
    });
}

// ============================================================================
// Markup
// ============================================================================

/// Compact markup files and rewrite their asset references.
///
/// Must run after the style/script stages: the cache-busting rewrite reads
/// the identity table those stages populate.
pub fn process_markup(
    files: &[PathBuf],
    config: &PipelineConfig,
    ctx: &BuildContext,
    progress: Option<&ProgressLine>,
) {
    files.par_iter().for_each(|path| {
        let result = process_markup_file(path, config, ctx);
        finish_file(result, &ctx.stats.markup, path, config, ctx);
        if let Some(p) = progress {
            p.inc("markup");
        }
    });
}

fn process_markup_file(path: &Path, config: &PipelineConfig, ctx: &BuildContext) -> Result<()> {
    let rel = rel_key(path, &config.build.input);
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let content = if config.build.minify_markup {
        markup::minify_html(&source)
    } else {
        source
    };
    let content = rewrite::rewrite_markup(&content, config, ctx);

    write_output(&config.build.output.join(rel), content.as_bytes())
}

/// Write a file, creating parent directories as needed.
fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}
