//! Script minification via oxc.
//!
//! Compresses with console/debugger stripping and mangles identifiers.

use anyhow::{Result, anyhow};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

/// Minify JavaScript source code.
///
/// Parse errors abort processing of the single file only; the caller logs
/// and continues with the rest of the class.
pub fn minify_js(source: &str) -> Result<String> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        let first = ret.errors.first().map(ToString::to_string).unwrap_or_default();
        return Err(anyhow!("js parse error: {first}"));
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions {
            drop_console: true,
            drop_debugger: true,
            ..CompressOptions::smallest()
        }),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_js() {
        let out = minify_js("const answer = 1 + 1;\nexport { answer };").unwrap();
        assert!(!out.contains('\n') || out.len() < 40);
    }

    #[test]
    fn test_minify_js_strips_console() {
        let out = minify_js("export function f(x) { console.log(x); return x * 2; }").unwrap();
        assert!(!out.contains("console.log"));
    }

    #[test]
    fn test_minify_js_strips_debugger() {
        let out = minify_js("export function g() { debugger; return 1; }").unwrap();
        assert!(!out.contains("debugger"));
    }

    #[test]
    fn test_minify_js_parse_error() {
        assert!(minify_js("function {").is_err());
    }
}
