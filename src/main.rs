//! folio - validated blog content to an RSS feed, robots.txt and sitemaps.

mod cli;
mod config;
mod content;
mod core;
mod generator;
mod image;
mod logger;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, build::build_site, check::check_site, serve::serve_site};
use config::SiteConfig;
use std::sync::Arc;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = Arc::new(SiteConfig::load(&cli)?);

    match &cli.command {
        Commands::Build { .. } => build_site(&config).map(|_| ()),
        Commands::Serve { .. } => serve_site(config),
        Commands::Check { .. } => check_site(&config),
    }
}
