//! Markup whitespace compaction.
//!
//! A purely lexical transform: collapses whitespace runs to a single space,
//! removes whitespace between tags, and trims the ends. It is not an HTML
//! parser — whitespace-sensitive regions (`<pre>`, inline `<script>` bodies)
//! are compacted like everything else. Known limitation, kept deliberately:
//! the rewrite grammar stays small and predictable.

use regex::Regex;
use std::sync::LazyLock;

static WS_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());
static BETWEEN_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">\s+<").unwrap());

/// Collapse whitespace in an HTML document.
pub fn minify_html(source: &str) -> String {
    let collapsed = WS_RUNS.replace_all(source, " ");
    let joined = BETWEEN_TAGS.replace_all(&collapsed, "><");
    joined.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_runs() {
        assert_eq!(
            minify_html("<p>hello    world</p>"),
            "<p>hello world</p>"
        );
    }

    #[test]
    fn test_removes_whitespace_between_tags() {
        assert_eq!(
            minify_html("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>"),
            "<ul><li>a</li><li>b</li></ul>"
        );
    }

    #[test]
    fn test_trims_document() {
        assert_eq!(minify_html("\n\n<html></html>\n"), "<html></html>");
    }

    #[test]
    fn test_single_spaces_preserved() {
        assert_eq!(minify_html("<b>a</b> <i>b</i>"), "<b>a</b><i>b</i>");
        assert_eq!(minify_html("<p>one two</p>"), "<p>one two</p>");
    }
}
