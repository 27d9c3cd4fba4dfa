//! PWA artifact generation.
//!
//! Emits three files derived from `[pwa]` configuration:
//!
//! - `manifest.json` — web-app manifest (empty icon list; icons are managed
//!   outside this pipeline)
//! - `sw.js` — worker script whose cache name embeds the build version;
//!   pre-caches a fixed set of root paths on install, purges stale caches
//!   on activate, and serves cache-first with network fallback and the
//!   offline page as last resort
//! - `offline.html` — static fallback page

use std::fs;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::PipelineConfig;

use super::{Template, TemplateVars};

/// Variables for the sw.js template.
pub struct WorkerVars {
    pub cache_name: String,
    pub precache_urls: Vec<String>,
    pub offline_url: String,
}

impl TemplateVars for WorkerVars {
    fn apply(&self, content: &str) -> String {
        content
            .replace("__CACHE_NAME__", &self.cache_name)
            .replace(
                "__PRECACHE_URLS__",
                &serde_json::to_string(&self.precache_urls).unwrap_or_else(|_| "[]".into()),
            )
            .replace("__OFFLINE_URL__", &self.offline_url)
    }
}

/// Variables for the offline.html template.
pub struct OfflineVars {
    pub name: String,
    pub lang: String,
    pub theme_color: String,
    pub background_color: String,
}

impl TemplateVars for OfflineVars {
    fn apply(&self, content: &str) -> String {
        content
            .replace("__NAME__", &self.name)
            .replace("__LANG__", &self.lang)
            .replace("__THEME_COLOR__", &self.theme_color)
            .replace("__BACKGROUND_COLOR__", &self.background_color)
    }
}

/// Installable worker script.
pub const WORKER_JS: Template<WorkerVars> = Template::new(include_str!("templates/sw.js"));

/// Offline fallback page.
pub const OFFLINE_HTML: Template<OfflineVars> =
    Template::new(include_str!("templates/offline.html"));

/// Web-app manifest schema.
#[derive(Serialize)]
struct WebAppManifest<'a> {
    name: &'a str,
    short_name: &'a str,
    description: &'a str,
    start_url: &'a str,
    display: &'a str,
    orientation: &'a str,
    theme_color: &'a str,
    background_color: &'a str,
    scope: &'a str,
    icons: &'a [serde_json::Value],
    categories: &'a [String],
    lang: &'a str,
    dir: &'a str,
}

/// Cache name for the current build, e.g. `admin-v1700000000`.
fn cache_name(config: &PipelineConfig) -> String {
    let slug: String = config
        .pwa
        .short_name()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let slug = slug.trim_matches('-');
    let slug = if slug.is_empty() { "app" } else { slug };
    format!("{slug}-v{}", config.cache.version)
}

/// Root paths pre-cached at install time.
fn precache_urls(config: &PipelineConfig) -> Vec<String> {
    let base = &config.build.base_path;
    vec![
        format!("{base}/"),
        format!("{base}/index.html"),
        format!("{base}/offline.html"),
    ]
}

/// Write manifest.json, sw.js and offline.html to the output root.
pub fn write_artifacts(config: &PipelineConfig) -> Result<()> {
    let output = &config.build.output;
    let pwa = &config.pwa;

    let manifest = WebAppManifest {
        name: &pwa.name,
        short_name: pwa.short_name(),
        description: &pwa.description,
        start_url: &pwa.start_url,
        display: &pwa.display,
        orientation: &pwa.orientation,
        theme_color: &pwa.theme_color,
        background_color: &pwa.background_color,
        scope: &pwa.scope,
        icons: &[],
        categories: &pwa.categories,
        lang: &pwa.lang,
        dir: &pwa.dir,
    };
    fs::write(
        output.join("manifest.json"),
        serde_json::to_vec_pretty(&manifest)?,
    )
    .context("failed to write manifest.json")?;

    let worker = WORKER_JS.render(&WorkerVars {
        cache_name: cache_name(config),
        precache_urls: precache_urls(config),
        offline_url: format!("{}/offline.html", config.build.base_path),
    });
    fs::write(output.join("sw.js"), worker).context("failed to write sw.js")?;

    let offline = OFFLINE_HTML.render(&OfflineVars {
        name: pwa.name.clone(),
        lang: pwa.lang.clone(),
        theme_color: pwa.theme_color.clone(),
        background_color: pwa.background_color.clone(),
    });
    fs::write(output.join("offline.html"), offline).context("failed to write offline.html")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.build.output = dir.path().to_path_buf();
        config.pwa.enable = true;
        config.pwa.name = "Admin Console".into();
        config.pwa.short_name = "Admin".into();
        config.pwa.theme_color = "#123456".into();
        config.pwa.background_color = "#fafafa".into();
        config.cache.version = "42".into();
        config
    }

    #[test]
    fn test_worker_embeds_version() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        write_artifacts(&config).unwrap();

        let sw = fs::read_to_string(dir.path().join("sw.js")).unwrap();
        assert!(sw.contains("v42"));
        assert!(sw.contains(r#"const CACHE_NAME = "admin-v42";"#));
        assert!(sw.contains("/offline.html"));
        assert!(!sw.contains("__CACHE_NAME__"));
        assert!(!sw.contains("__PRECACHE_URLS__"));
    }

    #[test]
    fn test_manifest_roundtrips() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        write_artifacts(&config).unwrap();

        let raw = fs::read(dir.path().join("manifest.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(parsed["name"], "Admin Console");
        assert_eq!(parsed["short_name"], "Admin");
        assert_eq!(parsed["theme_color"], "#123456");
        assert_eq!(parsed["background_color"], "#fafafa");
        assert_eq!(parsed["display"], "standalone");
        assert_eq!(parsed["icons"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_offline_page_substitution() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        write_artifacts(&config).unwrap();

        let offline = fs::read_to_string(dir.path().join("offline.html")).unwrap();
        assert!(offline.contains("Admin Console"));
        assert!(offline.contains("#123456"));
        assert!(!offline.contains("__NAME__"));
    }

    #[test]
    fn test_cache_name_slug() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.pwa.short_name = "My App!".into();
        assert_eq!(cache_name(&config), "my-app-v42");
    }

    #[test]
    fn test_precache_respects_base_path() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.build.base_path = "/admin".into();
        let urls = precache_urls(&config);
        assert_eq!(urls[0], "/admin/");
        assert!(urls.contains(&"/admin/offline.html".to_string()));
    }
}
