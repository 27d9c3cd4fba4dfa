//! Pipeline configuration management for `optipress.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/   # Configuration section definitions
//! │   ├── build      # [build]  roots + transform switches
//! │   ├── cache      # [cache]  cache-busting + version token
//! │   ├── cdn        # [cdn]    host rewriting
//! │   ├── compress   # [compress] gzip/brotli siblings
//! │   ├── inline     # [inline] small-asset embedding
//! │   └── pwa        # [pwa]    offline/installable artifacts
//! ├── error      # ConfigError
//! └── mod.rs     # PipelineConfig (this file)
//! ```
//!
//! The loaded configuration is an immutable snapshot: it is finalized once
//! (paths normalized, version token resolved, CLI overrides applied) and
//! then only ever passed around by shared reference. No stage mutates it.

mod error;
pub mod section;

pub use error::ConfigError;
pub use section::{BuildConfig, CacheConfig, CdnConfig, CompressConfig, InlineConfig, PwaConfig};

use crate::cli::{BuildArgs, Cli};
use crate::log;
use crate::utils::path::normalize_path;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing optipress.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Roots and transform switches
    pub build: BuildConfig,

    /// Cache-busting settings
    pub cache: CacheConfig,

    /// CDN redirection settings
    pub cdn: CdnConfig,

    /// Small-asset inlining settings
    pub inline: InlineConfig,

    /// Compressed-sibling settings
    pub compress: CompressConfig,

    /// PWA artifact settings
    pub pwa: PwaConfig,
}

impl PipelineConfig {
    /// Load configuration for a build run.
    ///
    /// Reads the config file named by the CLI, applies build-arg overrides
    /// and validates the result. The returned snapshot is final.
    pub fn load(cli: &Cli, args: &BuildArgs) -> Result<Self> {
        let config_path = normalize_path(&cli.config);
        if !config_path.is_file() {
            bail!(ConfigError::Validation(format!(
                "config file '{}' not found. Run 'optipress init' to create a new project.",
                cli.config.display()
            )));
        }

        let mut config = Self::from_path(&config_path)?;
        config.config_path = config_path;
        config.finalize(args);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            log!("warning"; "unknown fields in {}, ignoring:",
                path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default());
            for field in &ignored {
                eprintln!("- {}", field);
            }
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Finalize configuration after loading.
    ///
    /// Normalizes paths against the project root, resolves the version
    /// token, and applies CLI overrides. After this the snapshot is frozen.
    fn finalize(&mut self, args: &BuildArgs) {
        self.root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        self.build.input = normalize_path(&self.root.join(&self.build.input));
        self.build.output = normalize_path(&self.root.join(&self.build.output));
        self.build.normalize_base_path();
        self.cdn.normalize();
        self.cache.resolve_version();

        self.apply_build_args(args);
    }

    /// Apply build arguments from CLI.
    fn apply_build_args(&mut self, args: &BuildArgs) {
        crate::logger::set_verbose(args.verbose);

        self.build.clean = args.clean;

        if let Some(minify) = args.minify {
            self.build.minify_markup = minify;
            self.build.minify_styles = minify;
            self.build.minify_scripts = minify;
        }
        if let Some(images) = args.images {
            self.build.optimize_images = images;
        }
    }

    /// Validate the finalized configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.build.input.is_dir() {
            bail!(ConfigError::Validation(format!(
                "input directory '{}' does not exist",
                self.build.input.display()
            )));
        }
        if self.build.input == self.build.output {
            bail!(ConfigError::Validation(
                "input and output directories must differ".into()
            ));
        }
        if self.cdn.enable && self.cdn.base_url.is_empty() {
            bail!(ConfigError::Validation(
                "[cdn] enable = true requires base_url".into()
            ));
        }
        if self.pwa.enable && self.pwa.name.is_empty() {
            bail!(ConfigError::Validation(
                "[pwa] enable = true requires name".into()
            ));
        }
        if self.compress.level > 11 {
            bail!(ConfigError::Validation(format!(
                "[compress] level {} out of range (0-11)",
                self.compress.level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_invalid_toml() {
        let result: Result<PipelineConfig, _> = toml::from_str("[build\ninput = \"src\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert!(config.build.minify_markup);
        assert!(config.cache.enable);
        assert!(!config.cdn.enable);
        assert!(!config.pwa.enable);
        assert!(config.compress.gzip);
        assert_eq!(config.inline.max_bytes, 8192);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[build]\ninput = \"www\"\n[unknown_section]\nfield = 1";
        let (config, ignored) = PipelineConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.build.input, PathBuf::from("www"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "[build]\ninput = \"www\"\n[cache]\nversion = \"42\"";
        let (config, ignored) = PipelineConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
        assert_eq!(config.cache.version, "42");
    }

    #[test]
    fn test_validate_cdn_requires_base_url() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = PipelineConfig::default();
        config.build.input = dir.path().to_path_buf();
        config.build.output = dir.path().join("dist");
        config.cdn.enable = true;

        assert!(config.validate().is_err());

        config.cdn.base_url = "https://cdn.example.com".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_input() {
        let mut config = PipelineConfig::default();
        config.build.input = PathBuf::from("/nonexistent/input");
        assert!(config.validate().is_err());
    }
}
