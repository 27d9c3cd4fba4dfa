//! Stylesheet minification via lightningcss.

use anyhow::{Result, anyhow};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

/// Minify CSS source code.
///
/// Parse or print errors abort processing of the single file only; the
/// caller logs and continues with the rest of the class.
pub fn minify_css(source: &str) -> Result<String> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| anyhow!("css parse error: {e}"))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("css print error: {e}"))?;
    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_css() {
        let out = minify_css("body {\n  color: #ff0000;\n}\n").unwrap();
        assert!(out.len() < "body {\n  color: #ff0000;\n}\n".len());
        assert!(out.contains("body"));
        assert!(!out.contains('\n'));
    }

    #[test]
    fn test_minify_css_invalid_selector() {
        assert!(minify_css("%%% { color: red }").is_err());
    }

    #[test]
    fn test_minify_css_shortens_colors() {
        let out = minify_css("a { color: #ff0000; }").unwrap();
        assert!(out.contains("red") || out.contains("#f00"));
    }
}
