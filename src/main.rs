//! Optipress - asset optimization and cache-busting pipeline.

#![allow(dead_code)]

mod cli;
mod compress;
mod config;
mod core;
mod generator;
mod logger;
mod manifest;
mod pipeline;
mod rewrite;
mod transform;
mod utils;
mod version;
mod walker;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::PipelineConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match &cli.command {
        Commands::Init { name } => cli::init::new_project(&cli, name.as_deref()),
        Commands::Build { build_args } => {
            let config = PipelineConfig::load(&cli, build_args)?;
            pipeline::run(&config)
        }
    }
}
