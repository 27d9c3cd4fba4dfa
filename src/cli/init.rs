//! Project scaffolding for `optipress init`.

use std::fs;
use std::path::Path;

use anyhow::{Result, bail};

use crate::log;

use super::Cli;

/// Starter configuration written by `optipress init`.
const STARTER_CONFIG: &str = r##"[build]
input = "src"
output = "dist"
# base_path = "/admin"
minify_markup = true
minify_styles = true
minify_scripts = true
optimize_images = true

[cache]
enable = true
# version = "1700000000"   # defaults to the build timestamp

[inline]
styles = false
scripts = false
images = false
max_bytes = 8192

[compress]
gzip = true
brotli = true
level = 9

[cdn]
enable = false
base_url = ""

[pwa]
enable = false
name = ""
theme_color = "#ffffff"
background_color = "#ffffff"
"##;

/// Input subdirectories scaffolded for a new project.
const INPUT_SKELETON: [&str; 4] = ["css", "js", "images", "fonts"];

/// Create a new project: starter config plus input skeleton.
pub fn new_project(cli: &Cli, name: Option<&Path>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let root = match name {
        Some(name) => cwd.join(name),
        None => cwd,
    };

    let config_path = root.join(&cli.config);
    if config_path.exists() {
        bail!(
            "config file '{}' already exists, refusing to overwrite",
            config_path.display()
        );
    }

    fs::create_dir_all(&root)?;
    fs::write(&config_path, STARTER_CONFIG)?;

    for sub in INPUT_SKELETON {
        fs::create_dir_all(root.join("src").join(sub))?;
    }

    log!("init"; "created {}", config_path.display());
    log!("init"; "run 'optipress build' after adding files under src/");
    Ok(())
}
