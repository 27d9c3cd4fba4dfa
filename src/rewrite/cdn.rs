//! CDN host rewrite.
//!
//! Replaces eligible local references with
//! `<cdn-base>/<path-with-leading-slash-stripped>`. Runs after the
//! cache-busting pass, so eligibility is judged on the path component with
//! any query string stripped, and the query survives the substitution.

use regex::{Captures, Regex};
use rustc_hash::FxHashSet;
use std::sync::LazyLock;

use crate::config::PipelineConfig;

static URL_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\b(href|src)\s*=\s*["']([^"']+)["']"#).unwrap());

/// Move eligible references in a document onto the CDN host.
pub fn apply(html: &str, config: &PipelineConfig) -> String {
    let eligible: FxHashSet<&str> = config.cdn.extensions.iter().map(String::as_str).collect();
    let base = &config.cdn.base_url;

    URL_ATTR
        .replace_all(html, |caps: &Captures| {
            let (attr, value) = (&caps[1], &caps[2]);
            match rewrite_value(value, base, &eligible) {
                Some(rewritten) => format!(r#"{attr}="{rewritten}""#),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn rewrite_value(value: &str, base: &str, eligible: &FxHashSet<&str>) -> Option<String> {
    // Already absolute or embedded content: not ours to move
    if value.contains("://") || value.starts_with("//") || value.starts_with("data:") {
        return None;
    }

    let (path, query) = match value.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (value, None),
    };

    let ext = path.rsplit('/').next()?.rsplit_once('.')?.1.to_ascii_lowercase();
    if !eligible.contains(ext.as_str()) {
        return None;
    }

    let trimmed = path.trim_start_matches('/');
    Some(match query {
        Some(q) => format!("{base}/{trimmed}?{q}"),
        None => format!("{base}/{trimmed}"),
    })
}
