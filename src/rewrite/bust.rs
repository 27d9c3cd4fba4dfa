//! Cache-busting query rewrite.
//!
//! Appends `?v=<digest>` to `.css`/`.js` references, preferring the
//! identity table's digest for the exact reference path and falling back to
//! the global build version token when no digest was recorded. References
//! that already carry a query string do not match and are left alone.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::config::PipelineConfig;
use crate::core::BuildContext;

use super::ref_rel_key;

static STYLE_SCRIPT_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(href|src)\s*=\s*["']([^"']+\.(?:css|js))["']"#).unwrap()
});

/// Append version queries to style/script references in a document.
pub fn apply(html: &str, config: &PipelineConfig, ctx: &BuildContext) -> String {
    STYLE_SCRIPT_REF
        .replace_all(html, |caps: &Captures| {
            let (attr, value) = (&caps[1], &caps[2]);
            match ref_rel_key(value, &config.build.base_path) {
                Some(rel) => {
                    let version = ctx.version_or(&rel, &config.cache.version);
                    format!(r#"{attr}="{value}?v={version}""#)
                }
                // External or empty reference: leave untouched
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
