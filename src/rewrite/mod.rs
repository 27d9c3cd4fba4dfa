//! Markup reference rewriting.
//!
//! Three independent lexical rewrites over the same family of tag/attribute
//! pairs (`link[href]`, `script[src]`, `img[src]`), applied in a fixed
//! order:
//!
//! 1. [`inline`] — embed small assets directly into the document
//! 2. [`bust`] — append `?v=<hash-or-version>` to style/script references
//! 3. [`cdn`] — move eligible references onto the CDN host
//!
//! These are global text substitutions, not DOM transforms: a matching
//! pattern inside an HTML comment or a string literal is rewritten too.
//! Accepted limitation of the small fixed attribute grammar.

pub mod bust;
pub mod cdn;
pub mod inline;

use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::core::BuildContext;
use crate::version;

/// Apply all enabled rewrites to a markup document.
pub fn rewrite_markup(html: &str, config: &PipelineConfig, ctx: &BuildContext) -> String {
    let mut out = String::from(html);
    if config.inline.any() {
        out = inline::apply(&out, config, ctx);
    }
    if config.cache.enable {
        out = bust::apply(&out, config, ctx);
    }
    if config.cdn.enable {
        out = cdn::apply(&out, config);
    }
    out
}

/// Reduce a reference value to its output-relative key.
///
/// Strips query/fragment, a leading `./`, the public base path and the
/// leading slash. External (`scheme://`, protocol-relative) and `data:`
/// references yield `None` — they cannot resolve on disk.
pub(crate) fn ref_rel_key(value: &str, base_path: &str) -> Option<String> {
    if value.contains("://") || value.starts_with("data:") || value.starts_with("//") {
        return None;
    }
    let path = value.split(['?', '#']).next().unwrap_or(value);
    let mut path = path.trim_start_matches("./");
    if !base_path.is_empty()
        && let Some(stripped) = path.strip_prefix(base_path)
    {
        path = stripped;
    }
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}

/// Resolve a reference key to its on-disk output file.
///
/// Cache busting renames style/script files, so a miss on the plain path
/// retries under the hashed name recorded in the identity table. A
/// reference that resolves nowhere stays untouched in the document.
pub(crate) fn resolve_output(
    rel: &str,
    config: &PipelineConfig,
    ctx: &BuildContext,
) -> Option<PathBuf> {
    let direct = config.build.output.join(rel);
    if direct.is_file() {
        return Some(direct);
    }
    let digest = ctx.version_for(rel)?;
    let hashed = config.build.output.join(version::hashed_rel_path(rel, &digest));
    hashed.is_file().then_some(hashed)
}
