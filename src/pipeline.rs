//! Pipeline orchestration.
//!
//! One batch pass over the input tree:
//!
//! - **Init** - output skeleton (idempotent), optional clean
//! - **Collect** - walk the input tree per asset class
//! - **Transform** - styles, scripts, images, then markup (the reference
//!   rewriter needs the identity table the first two stages populate)
//! - **Manifest** - re-scan the settled output tree, write the asset index
//! - **PWA / Compress / CDN** - optional side outputs
//! - **Report** - summary counters
//!
//! Only an inaccessible input root or an unwritable output root fails the
//! run; per-file transform and compression errors are recovered with a
//! warning and the batch keeps going.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::compress;
use crate::config::PipelineConfig;
use crate::core::{BuildContext, BuildStats};
use crate::generator;
use crate::log;
use crate::logger::ProgressLine;
use crate::manifest;
use crate::transform::{self, FONT_EXTS, IMAGE_EXTS};
use crate::utils::plural_count;
use crate::walker;

/// Fixed output subdirectories created during Init.
const OUTPUT_SKELETON: [&str; 5] = ["css", "js", "images", "fonts", "assets"];

/// Collected files for one run.
struct BuildFiles {
    markup: Vec<PathBuf>,
    styles: Vec<PathBuf>,
    scripts: Vec<PathBuf>,
    images: Vec<PathBuf>,
    fonts: Vec<PathBuf>,
}

/// Execute one full pipeline run against the loaded configuration.
pub fn run(config: &PipelineConfig) -> Result<()> {
    let started = Instant::now();

    init_output(config)?;
    let files = collect_files(config)?;
    let ctx = BuildContext::new();
    let progress = create_progress(&files);

    // Styles and scripts settle the identity table before markup rewriting
    transform::process_styles(&files.styles, config, &ctx, progress.as_ref());
    transform::process_scripts(&files.scripts, config, &ctx, progress.as_ref());
    transform::process_images(&files.images, config, &ctx, progress.as_ref());
    transform::process_fonts(&files.fonts, config, &ctx, progress.as_ref());
    transform::process_markup(&files.markup, config, &ctx, progress.as_ref());

    if let Some(p) = progress {
        p.finish();
    }

    // All file-producing transforms have settled; the manifest sees the
    // final on-disk state.
    manifest::write_manifest(config, &ctx)?;

    if config.pwa.enable {
        generator::pwa::write_artifacts(config)?;
    }
    if config.compress.any() {
        compress::run(config, &ctx)?;
    }
    if config.cdn.enable {
        generator::cdn::write_descriptor(config)?;
    }

    report(config, &ctx, started);
    Ok(())
}

/// Create the output skeleton (no-op if already present).
fn init_output(config: &PipelineConfig) -> Result<()> {
    let output = &config.build.output;

    if config.build.clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("failed to clear output directory {}", output.display()))?;
    }

    fs::create_dir_all(output)
        .with_context(|| format!("output root {} is not writable", output.display()))?;
    for sub in OUTPUT_SKELETON {
        fs::create_dir_all(output.join(sub))
            .with_context(|| format!("failed to create {}/{}", output.display(), sub))?;
    }
    Ok(())
}

/// Walk the input tree once per asset class.
///
/// Walker failures (unreadable directories) are fatal here: the run cannot
/// claim a complete pass otherwise.
fn collect_files(config: &PipelineConfig) -> Result<BuildFiles> {
    let input = &config.build.input;
    Ok(BuildFiles {
        markup: walker::walk(input, "html")?,
        styles: walker::walk(input, "css")?,
        scripts: walker::walk(input, "js")?,
        images: walker::walk_all(input, &IMAGE_EXTS)?,
        fonts: walker::walk_all(input, &FONT_EXTS)?,
    })
}

fn create_progress(files: &BuildFiles) -> Option<ProgressLine> {
    let total = files.markup.len()
        + files.styles.len()
        + files.scripts.len()
        + files.images.len()
        + files.fonts.len();
    if total == 0 {
        return None;
    }
    Some(ProgressLine::new(&[
        ("markup", files.markup.len()),
        ("styles", files.styles.len()),
        ("scripts", files.scripts.len()),
        ("images", files.images.len()),
        ("fonts", files.fonts.len()),
    ]))
}

/// Final textual report: which optimizations ran and what they touched.
fn report(config: &PipelineConfig, ctx: &BuildContext, started: Instant) {
    let stats = &ctx.stats;

    log!("summary";
        "markup {}, styles {}, scripts {}, images {} ({} copied verbatim)",
        BuildStats::get(&stats.markup),
        BuildStats::get(&stats.styles),
        BuildStats::get(&stats.scripts),
        BuildStats::get(&stats.images),
        BuildStats::get(&stats.copied),
    );

    let mut extras = vec![plural_count(ctx.hashed_count(), "hashed asset")];
    if config.inline.any() {
        extras.push(plural_count(
            BuildStats::get(&stats.inlined),
            "inlined reference",
        ));
    }
    if config.compress.any() {
        extras.push(plural_count(
            BuildStats::get(&stats.compressed),
            "compressed file",
        ));
    }
    if config.cdn.enable {
        extras.push(format!("cdn {}", config.cdn.base_url));
    }
    log!("summary"; "{}", extras.join(", "));

    let warnings = BuildStats::get(&stats.warnings);
    if warnings > 0 {
        log!("warning"; "{} recovered during the run", plural_count(warnings, "issue"));
    }
    log!("summary"; "done in {:.2?}", started.elapsed());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::style;
    use crate::utils::hash;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.build.input = dir.path().join("src");
        config.build.output = dir.path().join("dist");
        config.cache.version = "1700000000".into();
        fs::create_dir_all(&config.build.input).unwrap();
        config
    }

    fn read_manifest(config: &PipelineConfig) -> serde_json::Value {
        let raw = fs::read(config.build.output.join(manifest::MANIFEST_NAME)).unwrap();
        serde_json::from_slice(&raw).unwrap()
    }

    #[test]
    fn test_skeleton_created() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        run(&config).unwrap();
        for sub in OUTPUT_SKELETON {
            assert!(config.build.output.join(sub).is_dir());
        }
        // Idempotent
        run(&config).unwrap();
    }

    #[test]
    fn test_missing_input_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.build.input = dir.path().join("nonexistent");

        assert!(run(&config).is_err());
    }

    #[test]
    fn test_cache_busted_style_end_to_end() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let css_dir = config.build.input.join("css");
        fs::create_dir_all(&css_dir).unwrap();
        fs::write(css_dir.join("style.css"), "body{color:red;}").unwrap();
        fs::write(
            config.build.input.join("index.html"),
            r#"<html><head><link rel="stylesheet" href="css/style.css"></head></html>"#,
        )
        .unwrap();

        run(&config).unwrap();

        // The output filename embeds the digest of the bytes on disk
        let minified = style::minify_css("body{color:red;}").unwrap();
        let digest = hash::fingerprint(&minified);
        let hashed = config
            .build
            .output
            .join(format!("css/style.{digest}.css"));
        assert!(hashed.exists());
        assert!(!config.build.output.join("css/style.css").exists());
        assert_eq!(hash::fingerprint(&fs::read(&hashed).unwrap()), digest);

        // Markup reference carries the digest as a version query
        let html = fs::read_to_string(config.build.output.join("index.html")).unwrap();
        assert!(html.contains(&format!("css/style.css?v={digest}")));

        // Manifest lists the hashed file with matching digest and size
        let manifest = read_manifest(&config);
        let entry = &manifest["assets"][format!("css/style.{digest}.css")];
        assert_eq!(entry["hash"].as_str().unwrap(), digest);
        assert_eq!(entry["size"].as_u64().unwrap() as usize, minified.len());
        assert_eq!(manifest["hashes"]["css/style.css"], digest.as_str());

        // Compression ran over the finalized files
        assert!(config.build.output.join("index.html.gz").exists());
        assert!(config.build.output.join("index.html.br").exists());
    }

    #[test]
    fn test_rerun_produces_identical_hashed_names() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let css = config.build.input.join("app.css");
        fs::write(&css, "p{margin:0}").unwrap();

        run(&config).unwrap();
        let first = walker::walk(&config.build.output, "css").unwrap();

        run(&config).unwrap();
        let second = walker::walk(&config.build.output, "css").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_small_stylesheet_inlined_end_to_end() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.inline.styles = true;
        config.inline.max_bytes = 8192;

        fs::write(config.build.input.join("style.css"), "body{color:red;}").unwrap();
        fs::write(
            config.build.input.join("index.html"),
            r#"<link rel="stylesheet" href="style.css">"#,
        )
        .unwrap();

        run(&config).unwrap();

        let html = fs::read_to_string(config.build.output.join("index.html")).unwrap();
        let minified = style::minify_css("body{color:red;}").unwrap();
        assert!(html.contains(&format!("<style>{minified}</style>")));
        assert!(!html.contains("<link"));
    }

    #[test]
    fn test_pwa_artifacts_emitted() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.pwa.enable = true;
        config.pwa.name = "Console".into();
        config.cache.version = "42".into();

        run(&config).unwrap();

        let sw = fs::read_to_string(config.build.output.join("sw.js")).unwrap();
        assert!(sw.contains("v42"));
        assert!(config.build.output.join("manifest.json").exists());
        assert!(config.build.output.join("offline.html").exists());
        // Worker and offline page get compressed siblings too
        assert!(config.build.output.join("sw.js.gz").exists());
    }

    #[test]
    fn test_cdn_descriptor_emitted() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.cdn.enable = true;
        config.cdn.base_url = "https://cdn.example.com".into();

        fs::write(
            config.build.input.join("index.html"),
            r#"<img src="/images/logo.png">"#,
        )
        .unwrap();

        run(&config).unwrap();

        assert!(
            config
                .build
                .output
                .join(generator::cdn::DESCRIPTOR_NAME)
                .exists()
        );
        let html = fs::read_to_string(config.build.output.join("index.html")).unwrap();
        assert!(html.contains("https://cdn.example.com/images/logo.png"));
    }

    #[test]
    fn test_markup_minified_by_default() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        fs::write(
            config.build.input.join("page.html"),
            "<html>\n  <body>\n    <p>hello   world</p>\n  </body>\n</html>",
        )
        .unwrap();

        run(&config).unwrap();

        let html = fs::read_to_string(config.build.output.join("page.html")).unwrap();
        assert_eq!(html, "<html><body><p>hello world</p></body></html>");
    }

    #[test]
    fn test_clean_removes_stale_output() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);

        run(&config).unwrap();
        fs::write(config.build.output.join("stale.txt"), "old").unwrap();

        config.build.clean = true;
        run(&config).unwrap();
        assert!(!config.build.output.join("stale.txt").exists());
    }
}
