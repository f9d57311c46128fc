//! `folio build`: write every generated document into the output directory.
//!
//! - **Init** - clean (with `--clean`) and create the output directory
//! - **Load** - read and validate the collection (fails closed)
//! - **Generate** - feed (with image processing) and sitemaps in parallel
//! - **Robots** - `robots.txt`

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::common::load_collection;
use crate::{
    config::SiteConfig,
    content::Collection,
    generator::{
        RequestContext, feed::render_feed, minify_xml, robots::render_robots,
        sitemap::render_sitemaps, write_output,
    },
    image::{ImageProcessor, ImageTransformer},
    log,
    logger::ProgressLine,
    utils::plural_count,
};

/// Files written by a build, in write order.
#[derive(Debug, Default)]
pub struct BuildOutput {
    pub files: Vec<PathBuf>,
}

pub fn build_site(config: &SiteConfig) -> Result<BuildOutput> {
    let started = Instant::now();
    init_output(config)?;

    let collection = load_collection(config)?;
    log!("content"; "{} in '{}'", plural_count(collection.len(), "post"), collection.name);

    let (feed, sitemaps) = rayon::join(
        || write_feed(config, &collection),
        || write_sitemaps(config, &collection),
    );

    let mut output = BuildOutput::default();
    output.files.extend(feed?);
    output.files.extend(sitemaps?);
    output.files.extend(write_robots(config)?);

    log!("build"; "{} written in {:.2?}", plural_count(output.files.len(), "file"), started.elapsed());
    Ok(output)
}

fn init_output(config: &SiteConfig) -> Result<()> {
    let output = &config.build.output;
    if config.build.clean && output.exists() {
        guard_output(output, config.get_root())?;
        fs::remove_dir_all(output).with_context(|| {
            format!("Failed to clear output directory: {}", output.display())
        })?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

/// Refuse to wipe the project itself.
fn guard_output(output: &Path, root: &Path) -> Result<()> {
    if root.starts_with(output) {
        bail!(
            "refusing to clean '{}': it contains the project root",
            output.display()
        );
    }
    Ok(())
}

fn write_feed(config: &SiteConfig, collection: &Collection) -> Result<Option<PathBuf>> {
    if !config.feed.enable {
        return Ok(None);
    }

    let site = config.base_url()?;
    let ctx = RequestContext::for_build(&site, &config.feed.path)?;
    let processor = ImageProcessor::from_config(config)?;

    let progress = (config.feed.social_images && !collection.is_empty())
        .then(|| ProgressLine::new("images", collection.len()));
    let xml = render_feed(
        config,
        &collection.entries,
        &ctx,
        Some(&processor as &dyn ImageTransformer),
        progress.as_ref(),
    );
    if let Some(progress) = progress {
        progress.finish();
    }

    let path = write_output(&config.build.output, &config.feed.path, &xml?)?;
    log!("feed"; "{}", config.root_relative(&path).display());
    Ok(Some(path))
}

fn write_sitemaps(config: &SiteConfig, collection: &Collection) -> Result<Vec<PathBuf>> {
    if !config.sitemap.enable {
        return Ok(Vec::new());
    }

    let maps = render_sitemaps(config, &collection.entries)?;
    let minify = config.build.minify;
    let index = write_output(
        &config.build.output,
        &config.sitemap.path,
        &minify_xml(&maps.index, minify),
    )?;
    let urlset = write_output(
        &config.build.output,
        &config.sitemap.urlset_path(),
        &minify_xml(&maps.urlset, minify),
    )?;

    log!("sitemap"; "{}", config.root_relative(&index).display());
    Ok(vec![index, urlset])
}

fn write_robots(config: &SiteConfig) -> Result<Option<PathBuf>> {
    if !config.robots.enable {
        return Ok(None);
    }

    let path = write_output(&config.build.output, &config.robots.path, &render_robots(config)?)?;
    log!("robots"; "{}", config.root_relative(&path).display());
    Ok(Some(path))
}
