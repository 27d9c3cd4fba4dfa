//! Small-asset inlining.
//!
//! References whose resolved on-disk size is at or below the configured
//! ceiling are replaced with the literal asset content: stylesheets become
//! `<style>` blocks, scripts become `<script>` blocks, images become base64
//! data URIs. Inlined content is the *output* (post-transform) bytes, so an
//! inlined stylesheet is the minified one. A reference that does not
//! resolve on disk is left untouched.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use regex::{Captures, Regex};
use std::fs;
use std::sync::LazyLock;

use crate::config::PipelineConfig;
use crate::core::{BuildContext, BuildStats};
use crate::utils::mime;

use super::{ref_rel_key, resolve_output};

static LINK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<link\b[^>]*?href\s*=\s*["']([^"']+)["'][^>]*?>"#).unwrap()
});
static SCRIPT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<script\b[^>]*?src\s*=\s*["']([^"']+)["'][^>]*?>\s*</script>"#).unwrap()
});
static IMG_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b([^>]*?)src\s*=\s*["']([^"']+)["']([^>]*?)/?>"#).unwrap()
});

/// Apply the enabled inlining passes to a document.
pub fn apply(html: &str, config: &PipelineConfig, ctx: &BuildContext) -> String {
    let mut out = String::from(html);

    if config.inline.styles {
        out = LINK_TAG
            .replace_all(&out, |caps: &Captures| {
                inline_style(&caps[1], config, ctx).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned();
    }
    if config.inline.scripts {
        out = SCRIPT_TAG
            .replace_all(&out, |caps: &Captures| {
                inline_script(&caps[1], config, ctx).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned();
    }
    if config.inline.images {
        out = IMG_TAG
            .replace_all(&out, |caps: &Captures| {
                inline_image(&caps[2], config, ctx)
                    .map(|uri| format!(r#"<img{}src="{uri}"{}>"#, &caps[1], &caps[3]))
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned();
    }

    out
}

/// Read an asset eligible for inlining, or `None` to keep the reference.
fn inlinable_bytes(value: &str, config: &PipelineConfig, ctx: &BuildContext) -> Option<Vec<u8>> {
    let rel = ref_rel_key(value, &config.build.base_path)?;
    let path = resolve_output(&rel, config, ctx)?;
    let size = fs::metadata(&path).ok()?.len();
    if size > config.inline.max_bytes {
        return None;
    }
    fs::read(&path).ok()
}

fn inline_style(href: &str, config: &PipelineConfig, ctx: &BuildContext) -> Option<String> {
    if !href_is(href, ".css") {
        return None;
    }
    let bytes = inlinable_bytes(href, config, ctx)?;
    let content = String::from_utf8(bytes).ok()?;
    BuildStats::inc(&ctx.stats.inlined);
    Some(format!("<style>{content}</style>"))
}

fn inline_script(src: &str, config: &PipelineConfig, ctx: &BuildContext) -> Option<String> {
    if !href_is(src, ".js") {
        return None;
    }
    let bytes = inlinable_bytes(src, config, ctx)?;
    let content = String::from_utf8(bytes).ok()?;
    BuildStats::inc(&ctx.stats.inlined);
    Some(format!("<script>{content}</script>"))
}

fn inline_image(src: &str, config: &PipelineConfig, ctx: &BuildContext) -> Option<String> {
    let rel = ref_rel_key(src, &config.build.base_path)?;
    let bytes = inlinable_bytes(src, config, ctx)?;
    let mime = mime::from_extension(rel.rsplit_once('.').map(|(_, ext)| ext));
    BuildStats::inc(&ctx.stats.inlined);
    Some(format!("data:{mime};base64,{}", BASE64.encode(bytes)))
}

/// Does the reference path (ignoring query/fragment) end with `suffix`?
fn href_is(value: &str, suffix: &str) -> bool {
    value
        .split(['?', '#'])
        .next()
        .is_some_and(|path| path.ends_with(suffix))
}
